use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bluepulse::ai::colab::ColabClient;
use bluepulse::ai::metrics::PerformanceMetrics;
use bluepulse::ai::monitor::HealthMonitor;
use bluepulse::ai::{AiManager, ModelClient};
use bluepulse::api::router::api_router;
use bluepulse::api::types::ApiContext;
use bluepulse::config::{self, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Arc::new(AppConfig::from_env());

    // Initialize the schema before serving
    bluepulse::db::open_database(&config.database_path)?;

    let client: Option<Arc<dyn ModelClient>> = match config.colab.api_url.as_deref() {
        Some(url) if config.colab.enabled => {
            tracing::info!(url, timeout_ms = config.colab.timeout.as_millis() as u64, "Colab service enabled");
            Some(Arc::new(ColabClient::new(url, config.colab.timeout)))
        }
        _ => {
            tracing::warn!("Colab service disabled - missing COLAB_API_URL or COLAB_ENABLED=false");
            None
        }
    };

    let monitor = match &client {
        Some(client) => HealthMonitor::spawn(Arc::clone(client), config.colab.health_interval),
        None => HealthMonitor::disabled(),
    };

    let ai = Arc::new(AiManager::new(client, Arc::new(PerformanceMetrics::new())));

    let ctx = ApiContext::new(
        Arc::clone(&config),
        ai,
        Arc::new(monitor),
        config.database_path.clone(),
    );
    let app = api_router(ctx);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
