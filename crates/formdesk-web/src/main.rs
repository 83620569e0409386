//! Formdesk web server.
//!
//! Run with: cargo run -p formdesk-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use formdesk_common::Config;
use formdesk_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("formdesk=debug,info")),
        )
        .init();

    info!("Starting Formdesk {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!(
        project = config.google.project_id.as_deref().unwrap_or("-"),
        location = %config.google.location,
        cloud_model = config.google.cloud_model_enabled(),
        document_ai = config.google.document_ai_enabled(),
        "Configuration loaded"
    );

    let bind = config.server.bind.clone();
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
