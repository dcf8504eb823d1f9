//! 产品存储接口
//!
//! 处理器只依赖这个 trait，具体存储由 `infrastructure` 提供。

use async_trait::async_trait;

use super::model::{Product, ProductFields};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("product {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 全部产品
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find(&self, id: i64) -> Result<Option<Product>, RepositoryError>;

    /// 查找产品，不存在时返回 `NotFound`
    async fn find_or_fail(&self, id: i64) -> Result<Product, RepositoryError> {
        self.find(id).await?.ok_or(RepositoryError::NotFound(id))
    }

    /// 创建产品，由存储层分配 id 和时间戳
    async fn create(&self, fields: &ProductFields) -> Result<Product, RepositoryError>;

    /// 覆盖全部字段
    async fn update(&self, id: i64, fields: &ProductFields) -> Result<Product, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 存活探测
    async fn ping(&self) -> Result<(), RepositoryError>;
}
