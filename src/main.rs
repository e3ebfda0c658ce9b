use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deskserver::config::AppConfig;
use deskserver::main_module::run_axum_server;
use deskserver::shared::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let app_state = Arc::new(AppState::new(config.clone()).map_err(std::io::Error::other)?);

    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );

    run_axum_server(app_state, &config.server.host, config.server.port).await
}
