//! 核心错误处理模块

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::response::StatusMessage;
use crate::app::product::repository::RepositoryError;

/// 字段 -> 错误消息列表
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 字段校验失败，返回 400 和逐字段的错误报告
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
    /// 更新或删除时记录不存在，返回 404 和统一的状态消息
    #[error("product not found")]
    ProductNotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 读取时记录不存在，使用通用错误结构
    #[error("not found: {0}")]
    NotFound(String),
    /// 未在处理器内部处理的存储层错误，原样向外传播
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

/// 通用错误响应结构（未经处理器整形的失败）
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    fn respond(status: StatusCode, error: &str, message: String) -> Response {
        let body = ErrorResponse {
            error: error.to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        match self {
            CoreError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(StatusMessage::validation_failed(errors)),
            )
                .into_response(),
            CoreError::ProductNotFound => (
                StatusCode::NOT_FOUND,
                Json(StatusMessage::error("Product not found")),
            )
                .into_response(),
            CoreError::BadRequest(msg) => {
                ErrorResponse::respond(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            CoreError::NotFound(id) => ErrorResponse::respond(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No query results for product {}", id),
            ),
            CoreError::Repository(RepositoryError::NotFound(id)) => {
                CoreError::NotFound(id.to_string()).into_response()
            }
            CoreError::Repository(err) => {
                error!("存储层错误: {}", err);
                ErrorResponse::respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Server Error".to_string(),
                )
            }
            CoreError::InternalServerError(msg) => {
                error!("内部错误: {}", msg);
                ErrorResponse::respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Server Error".to_string(),
                )
            }
        }
    }
}
