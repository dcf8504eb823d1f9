//! 产品接口集成测试（内存存储）

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use product_api::{
    app::product::validator::{Locale, ProductValidator},
    build_router, build_state,
    config::{Config, HttpConfig, StorageBackend},
    infrastructure::memory::InMemoryProductRepository,
    AppState,
};

fn create_test_server_with_locale(locale: Locale) -> TestServer {
    let state = AppState::new(
        Arc::new(InMemoryProductRepository::new()),
        ProductValidator::new(locale),
    );
    TestServer::new(build_router(state, &HttpConfig::default())).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with_locale(Locale::En)
}

fn pen() -> Value {
    json!({
        "name": "Pen",
        "description": "Blue ink pen",
        "price": "1.50"
    })
}

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let server = create_test_server();

    let response = server.post("/products").json(&pen()).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("location"), "/products/1");

    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"status": "Success", "message": "Product created successfully"})
    );

    let response = server.get("/products/1").await;
    response.assert_status_ok();
    let product: Value = response.json();
    assert_eq!(product["id"], 1);
    assert_eq!(product["name"], "Pen");
    assert_eq!(product["description"], "Blue ink pen");
    assert_eq!(product["price"], "1.50");
    assert!(product["created_at"].is_string());
    assert!(product["updated_at"].is_string());
}

#[tokio::test]
async fn test_list_products() {
    let server = create_test_server();

    let response = server.get("/products").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));

    server.post("/products").json(&pen()).await;
    server
        .post("/products")
        .json(&json!({"name": "Pencil", "description": "HB pencil", "price": 0.8}))
        .await;

    let products: Vec<Value> = server.get("/products").await.json();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Pen");
    assert_eq!(products[1]["name"], "Pencil");
    assert_eq!(products[1]["price"], "0.8");
}

#[tokio::test]
async fn test_create_validation_failure() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!({"name": "", "description": "x", "price": "abc"}))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "status": "Error",
            "message": "Validation failed",
            "errors": {
                "name": ["The Name field is required."],
                "price": ["The Price must be numeric."]
            }
        })
    );

    // 校验失败时不写入
    let products: Vec<Value> = server.get("/products").await.json();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_create_with_empty_body_reports_every_field() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!({}))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"]["name"], json!(["The Name field is required."]));
    assert_eq!(
        body["errors"]["description"],
        json!(["The Description field is required."])
    );
    assert_eq!(body["errors"]["price"], json!(["The Price field is required."]));
}

#[tokio::test]
async fn test_create_rejects_too_long_fields() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!({
            "name": "n".repeat(81),
            "description": "d".repeat(151),
            "price": 3
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["errors"],
        json!({
            "name": ["The Name must not exceed 80 characters."],
            "description": ["The Description must not exceed 150 characters."]
        })
    );
}

#[tokio::test]
async fn test_create_without_body_reports_every_field() {
    let server = create_test_server();

    let response = server.post("/products").expect_failure().await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "Error");
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"]["name"], json!(["The Name field is required."]));
    assert_eq!(
        body["errors"]["description"],
        json!(["The Description field is required."])
    );
    assert_eq!(body["errors"]["price"], json!(["The Price field is required."]));
}

#[tokio::test]
async fn test_create_from_form_fields() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .form(&[("name", "Pen"), ("description", "Blue ink pen"), ("price", "1.50")])
        .await;
    response.assert_status(StatusCode::CREATED);

    let product: Value = server.get("/products/1").await.json();
    assert_eq!(product["name"], "Pen");
    assert_eq!(product["price"], "1.50");

    let response = server
        .post("/products")
        .form(&[("name", "Pen"), ("price", "abc")])
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({
            "description": ["The Description field is required."],
            "price": ["The Price must be numeric."]
        })
    );
}

#[tokio::test]
async fn test_create_with_large_price() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!({"name": "a", "description": "b", "price": 1e40}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/products")
        .json(&json!({"name": "a", "description": "b", "price": "1e200000"}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["price"],
        json!(["The Price is out of range."])
    );
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let server = create_test_server();

    let response = server
        .post("/products")
        .json(&json!(["not", "an", "object"]))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "BAD_REQUEST");

    let response = server
        .post("/products")
        .text("{\"name\": ")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_integer_ids() {
    let server = create_test_server();

    // 读取：通用结构的 404
    let response = server.get("/products/abc").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "NOT_FOUND");

    // 更新：先校验
    let response = server
        .put("/products/abc")
        .json(&json!({"name": ""}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Validation failed");

    let not_found = json!({"status": "Error", "message": "Product not found"});

    let response = server
        .put("/products/abc")
        .json(&pen())
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), not_found);

    let response = server
        .delete("/products/99999999999999999999")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), not_found);

    let response = server.delete("/products/abc").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), not_found);
}

#[tokio::test]
async fn test_read_missing_product_is_not_shaped() {
    let server = create_test_server();

    let response = server.get("/products/999").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["code"], 404);
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn test_update_product() {
    let server = create_test_server();
    server.post("/products").json(&pen()).await;

    let response = server
        .put("/products/1")
        .json(&json!({"name": "Red pen", "description": "Red ink pen", "price": 2}))
        .await;

    // 更新成功同样返回 201
    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Success", "message": "Product updated successfully"})
    );

    let product: Value = server.get("/products/1").await.json();
    assert_eq!(product["name"], "Red pen");
    assert_eq!(product["description"], "Red ink pen");
    assert_eq!(product["price"], "2");
}

#[tokio::test]
async fn test_patch_is_a_full_overwrite() {
    let server = create_test_server();
    server.post("/products").json(&pen()).await;

    // 缺少字段时不做部分更新
    let response = server
        .patch("/products/1")
        .json(&json!({"name": "Only name"}))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .patch("/products/1")
        .json(&json!({"name": "Pen", "description": "Black ink pen", "price": "1.75"}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let product: Value = server.get("/products/1").await.json();
    assert_eq!(product["description"], "Black ink pen");
    assert_eq!(product["price"], "1.75");
}

#[tokio::test]
async fn test_update_missing_product() {
    let server = create_test_server();

    let response = server
        .put("/products/999")
        .json(&pen())
        .expect_failure()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Error", "message": "Product not found"})
    );
}

#[tokio::test]
async fn test_update_validates_before_lookup() {
    let server = create_test_server();

    let response = server
        .put("/products/999")
        .json(&json!({"name": "Pen"}))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Validation failed");
}

#[tokio::test]
async fn test_delete_twice() {
    let server = create_test_server();
    server.post("/products").json(&pen()).await;

    let response = server.delete("/products/1").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Success", "message": "Product deleted successfully"})
    );

    let response = server.delete("/products/1").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Error", "message": "Product not found"})
    );

    server
        .get("/products/1")
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_product() {
    let server = create_test_server();

    let response = server.delete("/products/999").expect_failure().await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "Error", "message": "Product not found"})
    );
}

#[tokio::test]
async fn test_spanish_validation_messages() {
    let server = create_test_server_with_locale(Locale::Es);

    let response = server
        .post("/products")
        .json(&json!({"name": 42, "description": "x"}))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"],
        json!({
            "name": ["El campo Nombre tiene que ser un texto."],
            "price": ["El campo Precio es requerido."]
        })
    );
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_build_state_uses_configured_locale() {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config.validation.locale = Locale::Es;

    let state = build_state(&config).await.unwrap();
    assert_eq!(state.validator.locale(), Locale::Es);

    let server = TestServer::new(build_router(state, &config.http)).unwrap();
    let response = server.post("/products").expect_failure().await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["name"],
        json!(["El campo Nombre es requerido."])
    );
}
