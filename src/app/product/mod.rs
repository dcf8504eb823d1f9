//! 产品资源

pub mod handler;
pub mod model;
pub mod repository;
pub mod validator;

use axum::{routing::get, Router};

use handler::{
    create_product, delete_product, get_product, health_check, list_products, update_product,
    AppState,
};

/// 产品路由表
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
}
