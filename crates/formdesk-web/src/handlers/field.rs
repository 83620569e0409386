//! Field explanation endpoint.
//!
//! Always answers 200. A body that does not parse, or a panic anywhere in the
//! explanation path, produces the degraded payload instead of an error status.

use std::panic::AssertUnwindSafe;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use formdesk_common::{FieldQuery, ResponsePayload};

use crate::state::SharedState;

/// JSON body of `POST /analyze-field`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyzeFieldRequest {
    #[serde(default)]
    pub field_context: Option<String>,
    #[serde(default)]
    pub section_context: Option<String>,
    #[serde(default)]
    pub form_name: Option<String>,
    #[serde(default)]
    pub page_context: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

impl From<AnalyzeFieldRequest> for FieldQuery {
    fn from(req: AnalyzeFieldRequest) -> Self {
        FieldQuery {
            field_label: req.field_context.unwrap_or_default(),
            section_context: req.section_context.unwrap_or_default(),
            form_name: req.form_name.unwrap_or_default(),
            page_context: req.page_context.unwrap_or_default(),
            target_lang: req.target_lang.unwrap_or_default(),
        }
    }
}

/// POST /analyze-field
pub async fn analyze_field(
    State(state): State<SharedState>,
    payload: Result<Json<AnalyzeFieldRequest>, JsonRejection>,
) -> Json<ResponsePayload> {
    let query: FieldQuery = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => {
            tracing::error!(operation = "analyze_field", error = %rejection, "Unreadable request body");
            return Json(ResponsePayload::degraded());
        }
    };

    match AssertUnwindSafe(state.explainer.explain(&query)).catch_unwind().await {
        Ok(payload) => Json(payload),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(operation = "analyze_field", error = %message, "Field explanation failed");
            Json(ResponsePayload::degraded())
        }
    }
}
