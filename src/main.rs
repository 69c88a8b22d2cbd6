use product_service::auth::JwtVerifier;
use product_service::config::load_config;
use product_service::infrastructure::{logger::Logger, store_from_config};
use product_service::ProductApp;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    Logger::init(&config.logging);

    info!("启动产品服务...");

    let store = store_from_config(&config.database);
    let verifier = Arc::new(JwtVerifier::from_config(&config.auth));
    let app = ProductApp::new(config, store, verifier);

    app.connect().await?;
    let addr = app.start().await?;

    info!("📖 API 端点 (均需 Authorization: Bearer <token>):");
    info!("   POST   http://{}/      - 创建产品", addr);
    info!("   GET    http://{}/      - 获取所有产品", addr);
    info!("   GET    http://{}/:id   - 获取特定产品", addr);

    tokio::signal::ctrl_c().await?;
    info!("收到退出信号，正在关闭...");

    app.stop().await?;
    app.disconnect().await?;

    info!("✅ 产品服务已退出");
    Ok(())
}
