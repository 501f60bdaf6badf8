//! Lodging assistant web server.
//!
//! Run with: cargo run
//!
//! Reads `.env`, then `MISTRAL_API_KEY`, `LOGIS_CATALOG`, `LOGIS_BIND`, ... from the
//! environment and serves the chat page.

use anyhow::Context;
use logis::config::AppConfig;
use logis::llm::gateways::MistralGateway;
use logis::web::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to read configuration")?;
    if config.gateway.api_key.is_empty() {
        warn!("MISTRAL_API_KEY is not set, the provider will reject completions");
    }

    let gateway = Arc::new(MistralGateway::with_config(config.gateway.clone())?);
    let state = AppState::new(&config, gateway)?;
    state
        .sessions
        .spawn_sweeper(config.session_ttl.min(Duration::from_secs(60)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        address = %config.bind_addr,
        catalog = %config.catalog_path.display(),
        model = %config.model,
        session_ttl_secs = config.session_ttl.as_secs(),
        "Lodging assistant listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
