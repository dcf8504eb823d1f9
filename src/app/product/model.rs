//! 产品数据模型

use chrono::{DateTime, Utc};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 已持久化的产品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// 以字符串形式序列化，保留提交时的小数位
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 通过校验后的写入字段（创建和更新都是整体覆盖）
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
}

impl Product {
    /// 用新字段覆盖当前记录
    pub fn apply(&mut self, fields: &ProductFields) {
        self.name = fields.name.clone();
        self.description = fields.description.clone();
        self.price = fields.price.clone();
        self.updated_at = Utc::now();
    }
}
