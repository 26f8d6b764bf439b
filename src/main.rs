use digitserve::{config, server, service::InferenceService};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::fs;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init logging and the metrics recorder
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // 2. Load Config
    let config_path = config::config_path();
    let config_content = fs::read_to_string(&config_path)?;
    let config: config::AppConfig = serde_yaml::from_str(&config_content)?;

    // 3. Load the checkpoint; the listener only binds once the service is ready,
    //    so no request can observe the loading state.
    let service = Arc::new(InferenceService::new());
    tracing::info!("loading checkpoint from {}", config.model.ckpt_path);
    service.load_checkpoint(&config.model.ckpt_path)?;

    // 4. Create Router
    let app = server::routes::create_router(service, metrics_handle);

    // 5. Bind & Serve
    let listener =
        TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await?;
    tracing::info!(
        "server listening on http://{}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
