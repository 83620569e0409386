//! Axum router: maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::handlers::{
    document::analyze_pdf,
    field::analyze_field,
    system::healthz,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);
    let static_dir = shared.config.server.static_dir.clone();
    let max_upload = shared.config.server.max_upload_bytes;

    Router::new()
        // Pages
        .route_service("/", ServeFile::new(static_dir.join("index.html")))

        // API endpoints
        .route("/healthz",       get(healthz))
        .route("/analyze-pdf",   post(analyze_pdf).layer(DefaultBodyLimit::max(max_upload)))
        .route("/analyze-field", post(analyze_field))

        // Static files
        .nest_service("/assets", ServeDir::new(static_dir.join("assets")))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
