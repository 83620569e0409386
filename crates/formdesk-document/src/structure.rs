//! Document-structure collaborators.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use formdesk_common::gcp::{self, GcpCredentials};
use formdesk_common::{FormdeskError, Result};
use std::time::Duration;

use crate::page_count::fallback_summary;

#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Returns a Document AI shaped JSON object with at least a `pages` array.
    async fn process(&self, pdf_bytes: &[u8]) -> Result<serde_json::Value>;
    fn name(&self) -> &str;
}

/// Page-count heuristic used when no processor is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummary;

#[async_trait]
impl DocumentProcessor for LocalSummary {
    async fn process(&self, pdf_bytes: &[u8]) -> Result<serde_json::Value> {
        Ok(fallback_summary(pdf_bytes))
    }

    fn name(&self) -> &str { "local" }
}

/// Document AI `processors/{id}:process`.
pub struct DocAiProcessor {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
    credentials: Option<GcpCredentials>,
    client: reqwest::Client,
}

impl DocAiProcessor {
    pub fn new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        processor_id: impl Into<String>,
        credentials: Option<GcpCredentials>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            project_id: project_id.into(),
            location: location.into(),
            processor_id: processor_id.into(),
            credentials,
            client: gcp::http_client(timeout)?,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{loc}-documentai.googleapis.com/v1/projects/{project}/locations/{loc}/processors/{id}:process",
            loc = self.location,
            project = self.project_id,
            id = self.processor_id,
        )
    }
}

#[async_trait]
impl DocumentProcessor for DocAiProcessor {
    async fn process(&self, pdf_bytes: &[u8]) -> Result<serde_json::Value> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            FormdeskError::Config("Document AI processor is set but Google credentials are missing".to_string())
        })?;
        let body = serde_json::json!({
            "rawDocument": {
                "content": BASE64.encode(pdf_bytes),
                "mimeType": "application/pdf",
            }
        });
        let resp = credentials
            .authorize(self.client.post(self.endpoint()))
            .json(&body)
            .send()
            .await?;
        let mut json = gcp::check_response_status(resp).await?;

        match json.get_mut("document").map(serde_json::Value::take) {
            Some(document) if document.is_object() => Ok(document),
            _ => Err(FormdeskError::Document("process response has no document".to_string())),
        }
    }

    fn name(&self) -> &str { "document_ai" }
}
