use product_api::{
    config::{config_file, load_config},
    infrastructure::logger::Logger,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let source = config_file();
    let config = load_config(source)?;
    Logger::init(&config.logging.level);

    match source {
        Some(path) => info!("从配置文件加载: {}", path),
        None => info!("未找到配置文件，使用默认配置"),
    }
    info!(storage = ?config.storage.backend, "启动产品服务...");

    product_api::serve(config).await
}
