//! PDF upload analysis endpoint.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct AnalyzePdfResponse {
    pub status: &'static str,
    pub page_count: usize,
    pub document: serde_json::Value,
}

/// POST /analyze-pdf: multipart upload with a `file` part.
pub async fn analyze_pdf(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzePdfResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(format!("expected a multipart upload: {e}")))?;
    let pdf_bytes = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
            .ok_or_else(|| ApiError::BadRequest("missing `file` part".to_string()))?;

        if field.name() != Some("file") {
            continue;
        }
        tracing::info!(filename = field.file_name().unwrap_or("-"), "Processing file");
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("could not read upload: {e}")))?;
        break bytes.to_vec();
    };

    let analysis = state.documents.analyze(pdf_bytes).await?;

    Ok(Json(AnalyzePdfResponse {
        status: "ok",
        page_count: analysis.page_count,
        document: analysis.document,
    }))
}
