//! Upload analysis pipeline: redact, then extract structure.
//!
//! Redaction is best effort: a failure is logged and the original bytes move
//! on. Structure extraction failures are returned to the caller.

use std::sync::Arc;

use formdesk_common::config::GoogleCloudConfig;
use formdesk_common::gcp::GcpCredentials;
use formdesk_common::Result;
use serde::Serialize;

use crate::redaction::{DlpRedactor, Redactor};
use crate::structure::{DocAiProcessor, DocumentProcessor, LocalSummary};

/// Outcome of a successful analysis.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub page_count: usize,
    pub document: serde_json::Value,
}

impl DocumentAnalysis {
    pub fn from_document(document: serde_json::Value) -> Self {
        let page_count = document["pages"].as_array().map_or(0, Vec::len);
        Self { page_count, document }
    }
}

pub struct DocumentPipeline {
    redactor: Option<Arc<dyn Redactor>>,
    processor: Arc<dyn DocumentProcessor>,
}

impl DocumentPipeline {
    pub fn new(redactor: Option<Arc<dyn Redactor>>, processor: Arc<dyn DocumentProcessor>) -> Self {
        Self { redactor, processor }
    }

    /// No redaction, local page count.
    pub fn local() -> Self {
        Self::new(None, Arc::new(LocalSummary))
    }

    pub fn from_config(google: &GoogleCloudConfig, credentials: Option<&GcpCredentials>) -> Result<Self> {
        let redactor: Option<Arc<dyn Redactor>> = match (google.redaction_enabled(), credentials, &google.project_id) {
            (true, Some(creds), Some(project)) => Some(Arc::new(
                DlpRedactor::new(project, creds.clone(), google.request_timeout())?,
            ) as Arc<dyn Redactor>),
            (true, None, _) => {
                tracing::warn!("Redaction configured but credentials are unavailable; uploads are not redacted");
                None
            }
            _ => None,
        };

        let processor: Arc<dyn DocumentProcessor> = match (&google.docai_processor_id, credentials) {
            (Some(id), creds) if google.document_ai_enabled() => {
                // Without credentials each upload fails with a config error.
                let project = google.project_id.clone().unwrap_or_default();
                Arc::new(DocAiProcessor::new(project, &google.docai_location, id, creds.cloned(), google.request_timeout())?) as Arc<dyn DocumentProcessor>
            }
            _ => Arc::new(LocalSummary),
        };

        tracing::info!(
            processor = processor.name(),
            redaction = redactor.is_some(),
            "Document pipeline ready"
        );
        Ok(Self::new(redactor, processor))
    }

    pub async fn analyze(&self, pdf_bytes: Vec<u8>) -> Result<DocumentAnalysis> {
        let bytes = match &self.redactor {
            Some(redactor) => match redactor.redact(&pdf_bytes).await {
                Ok(redacted) => redacted,
                Err(e) => {
                    tracing::warn!(operation = "redact", error = %e, "Redaction failed; continuing with original bytes");
                    pdf_bytes
                }
            },
            None => pdf_bytes,
        };

        let document = self.processor.process(&bytes).await.map_err(|e| {
            tracing::error!(operation = "process_document", processor = self.processor.name(), error = %e, "Document processing failed");
            e
        })?;

        Ok(DocumentAnalysis::from_document(document))
    }
}
