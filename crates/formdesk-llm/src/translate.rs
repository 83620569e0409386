//! Translation collaborator.

use async_trait::async_trait;
use formdesk_common::gcp::{self, GcpCredentials};
use std::time::Duration;

use crate::backend::LlmError;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, LlmError>;
}

/// Used when no translation project is configured: hands text back untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, text: &str, _source: Option<&str>, _target: &str) -> Result<String, LlmError> {
        Ok(text.to_string())
    }
}

/// Cloud Translation v3 `translateText`.
pub struct CloudTranslator {
    pub project_id: String,
    credentials: GcpCredentials,
    client: reqwest::Client,
}

impl CloudTranslator {
    pub fn new(project_id: impl Into<String>, credentials: GcpCredentials, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            project_id: project_id.into(),
            credentials,
            client: gcp::http_client(timeout)?,
        })
    }
}

pub fn translate_request_body(text: &str, source_lang: Option<&str>, target_lang: &str) -> serde_json::Value {
    let mut body = serde_json::json!({
        "contents": [text],
        "targetLanguageCode": target_lang,
        "mimeType": "text/plain",
    });
    if let Some(source) = source_lang {
        body["sourceLanguageCode"] = serde_json::Value::String(source.to_string());
    }
    body
}

#[async_trait]
impl Translator for CloudTranslator {
    async fn translate(&self, text: &str, source_lang: Option<&str>, target_lang: &str) -> Result<String, LlmError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let url = format!(
            "https://translation.googleapis.com/v3/projects/{}/locations/global:translateText",
            self.project_id
        );
        let resp = self.credentials
            .authorize(self.client.post(&url))
            .json(&translate_request_body(text, source_lang, target_lang))
            .send()
            .await?;
        let json = gcp::check_response_status(resp).await?;

        json["translations"][0]["translatedText"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::MalformedOutput("translation response has no translatedText".to_string()))
    }
}
