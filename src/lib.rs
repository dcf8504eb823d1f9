//! # 产品 REST 服务
//!
//! 提供单一资源 `Product` 的增删改查接口：
//! - `app`：路由、处理器、字段校验和存储接口
//! - `core`：错误类型、响应结构和中间件
//! - `infrastructure`：PostgreSQL / 内存存储和日志
//! - `config`：TOML 配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use std::{sync::Arc, time::Duration};

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub use app::product::handler::AppState;
use app::product::{repository::ProductRepository, validator::ProductValidator};
use config::{Config, HttpConfig, StorageBackend};
use infrastructure::{
    database::{DatabaseManager, PgProductRepository},
    memory::InMemoryProductRepository,
};

/// 组装路由和中间件
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    app::product::routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(
                    crate::core::middleware::request_logging_middleware,
                ))
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(http.timeout_seconds))),
        )
        .with_state(state)
}

/// 按配置选择存储后端并创建应用状态
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let repository: Arc<dyn ProductRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            info!(
                "连接数据库: {}",
                config.database.url.replace(":password@", ":***@")
            );
            let manager = DatabaseManager::new(&config.database).await?;
            manager.create_tables().await?;
            Arc::new(PgProductRepository::new(manager.get_pool().clone()))
        }
        StorageBackend::Memory => {
            info!("使用内存存储");
            Arc::new(InMemoryProductRepository::new())
        }
    };

    let validator = ProductValidator::new(config.validation.locale);
    info!("校验消息语言: {:?}", validator.locale());

    Ok(AppState::new(repository, validator))
}

/// 启动 HTTP 服务，收到 Ctrl-C 后优雅退出
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let app = build_router(state, &config.http);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 产品服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET       /products      - 获取所有产品");
    info!("   POST      /products      - 创建产品");
    info!("   GET       /products/:id  - 获取特定产品");
    info!("   PUT/PATCH /products/:id  - 更新产品");
    info!("   DELETE    /products/:id  - 删除产品");
    info!("   GET       /health        - 健康检查");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
        std::future::pending::<()>().await;
    }
}
