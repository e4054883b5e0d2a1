//! Formcraft API server

use anyhow::Context;
use formcraft_api::{build_router, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    if config.llm.api_key.is_none() {
        tracing::warn!("No LLM API key configured; form generation will fail");
    }

    let app = build_router(AppState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(
        addr = %config.server.bind_addr,
        model = %config.llm.model,
        validate_submissions = config.submissions.validate_payloads,
        "Formcraft API listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
