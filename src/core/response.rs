//! 核心响应处理模块

use serde::{Deserialize, Serialize};

use super::error::FieldErrors;

/// 响应状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// 变更操作的统一响应结构 `{status, message[, errors]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            errors: None,
        }
    }

    pub fn validation_failed(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::error("Validation failed")
        }
    }
}
