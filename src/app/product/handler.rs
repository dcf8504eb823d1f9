//! 产品处理器

use std::{collections::HashMap, sync::Arc};

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Form,
};
use serde_json::{Map, Value};
use tracing::info;

use super::{
    model::Product,
    repository::{ProductRepository, RepositoryError},
    validator::ProductValidator,
};
use crate::core::{error::CoreError, response::StatusMessage};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProductRepository>,
    pub validator: Arc<ProductValidator>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>, validator: ProductValidator) -> Self {
        Self {
            repository,
            validator: Arc::new(validator),
        }
    }
}

/// 待校验的原始请求字段
///
/// 支持 JSON 对象和 `application/x-www-form-urlencoded` 表单；空请求体视为没有字段。
#[derive(Debug, Default)]
pub struct ProductInput(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for ProductInput
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;
            return Ok(Self(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            ));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(&body).map(Self).map_err(|e| {
            CoreError::BadRequest(format!("Failed to parse the request body as a JSON object: {}", e))
        })
    }
}

/// 非整数或越界的 id 不可能对应任何记录
fn parse_id(raw_id: &str) -> Option<i64> {
    raw_id.parse().ok()
}

/// 更新和删除时，记录不存在整形为 404 状态消息
fn shape_not_found(err: RepositoryError) -> CoreError {
    match err {
        RepositoryError::NotFound(_) => CoreError::ProductNotFound,
        other => CoreError::Repository(other),
    }
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.repository.list_all().await?;
    Ok(Json(products))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    ProductInput(input): ProductInput,
) -> Result<impl IntoResponse, CoreError> {
    let fields = state.validator.check(&input)?;
    let product = state.repository.create(&fields).await?;

    info!("创建产品: {} ({})", product.name, product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/products/{}", product.id))],
        Json(StatusMessage::success("Product created successfully")),
    ))
}

/// GET /products/:id
///
/// 记录不存在时直接向外传播存储层错误，不整形为状态消息。
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&raw_id).ok_or(CoreError::NotFound(raw_id))?;
    let product = state.repository.find_or_fail(id).await?;
    Ok(Json(product))
}

/// PUT/PATCH /products/:id
///
/// 先校验再查找记录；成功时沿用 201 状态码。
pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ProductInput(input): ProductInput,
) -> Result<(StatusCode, Json<StatusMessage>), CoreError> {
    let fields = state.validator.check(&input)?;
    let id = parse_id(&raw_id).ok_or(CoreError::ProductNotFound)?;
    let product = state
        .repository
        .update(id, &fields)
        .await
        .map_err(shape_not_found)?;

    info!("更新产品: {} ({})", product.name, product.id);

    Ok((
        StatusCode::CREATED,
        Json(StatusMessage::success("Product updated successfully")),
    ))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusMessage>, CoreError> {
    let id = parse_id(&raw_id).ok_or(CoreError::ProductNotFound)?;
    state
        .repository
        .delete(id)
        .await
        .map_err(shape_not_found)?;

    info!("删除产品: {}", id);

    Ok(Json(StatusMessage::success("Product deleted successfully")))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, CoreError> {
    state.repository.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
