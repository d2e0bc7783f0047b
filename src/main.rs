use anyhow::Result;
use career_compass::app_log;
use career_compass::core::{open_storage, AnalysisClient, ConfigManager};
use career_compass::web::AppState;
use career_compass::{start_web_server, HistoryStore};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("career_compass=info,rocket::server=off")),
        )
        .init();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    app_log!(info, "Starting Career Compass API Server");
    app_log!(
        info,
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    app_log!(info, "Data: {}", config.environment.data_path.display());
    app_log!(info, "Analysis service: {}", config.service.analysis_url);
    app_log!(info, "Server port: {}", config.port);

    let backend = open_storage(&config).await?;
    let store = HistoryStore::init(backend).await;
    let client = AnalysisClient::new(
        config.service.analysis_url.clone(),
        config.service.timeout_seconds,
    )?;

    start_web_server(AppState::new(client, store), config.port).await
}
