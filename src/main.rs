use amazon_ndvi::domain::model::AMAZON_REGION_LABEL;
use amazon_ndvi::utils::{logger, validation::Validate};
use amazon_ndvi::{build_router, AppState, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_server_logger(config.verbose);
    }

    tracing::info!("🚀 Starting Amazon NDVI Dashboard API...");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let ee_config = match config.earth_engine_config() {
        Ok(ee_config) => ee_config,
        Err(e) => {
            tracing::error!("❌ Failed to load Earth Engine configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Earth Engine config: {:?}", ee_config);

    // 啟動時只初始化一次
    let state = AppState::initialize(ee_config).await;

    tracing::info!(
        "🌍 Google Earth Engine Status: {}",
        if state.is_ready() { "✅ Ready" } else { "❌ Not Available" }
    );
    tracing::info!("📍 Region: {}", AMAZON_REGION_LABEL);
    tracing::info!("📊 Dataset: {}", state.dataset());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", addr);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
