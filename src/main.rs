//! Task Agent - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the agent API.

use task_agent::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize logging; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("task_agent={},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Loaded configuration: model={}", config.model);
    info!(
        "Starting {} server on {}:{}",
        config.agent_name, config.host, config.port
    );

    api::serve(config).await?;

    Ok(())
}
