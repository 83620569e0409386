//! Generative model backend trait and the Vertex AI Gemini implementation.
//!
//! The router only needs one call: send a system instruction plus a user
//! message and get text back. Anything that speaks that contract can stand in
//! for the cloud model (tests use in-process fakes).

use async_trait::async_trait;
use formdesk_common::gcp::{self, GcpCredentials};
use formdesk_common::FormdeskError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

impl From<FormdeskError> for LlmError {
    fn from(err: FormdeskError) -> Self {
        match err {
            FormdeskError::Http(e) => LlmError::Http(e),
            FormdeskError::Serialization(e) => LlmError::Serde(e),
            FormdeskError::Api { status, message } => LlmError::ApiError { status, message },
            other => LlmError::Unavailable(other.to_string()),
        }
    }
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,   // "system" | "user" | "assistant"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the model for a specific output format, e.g. `application/json`.
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
}

// ── Vertex AI Gemini ──────────────────────────────────────────────────────────

pub struct VertexGeminiBackend {
    pub project_id: String,
    pub location: String,
    pub model: String,
    credentials: GcpCredentials,
    client: reqwest::Client,
}

impl VertexGeminiBackend {
    pub fn new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        model: impl Into<String>,
        credentials: GcpCredentials,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            project_id: project_id.into(),
            location: location.into(),
            model: model.into(),
            credentials,
            client: gcp::http_client(timeout)?,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.location,
            project = self.project_id,
        )
    }
}

/// Translate chat-style messages into a Gemini `generateContent` body.
/// The system message becomes `systemInstruction`.
pub fn gemini_request_body(req: &LlmRequest) -> serde_json::Value {
    let system_text = req.messages.iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone());

    let contents: Vec<serde_json::Value> = req.messages.iter()
        .filter(|m| m.role != "system")
        .map(|m| {
            let role = if m.role == "assistant" { "model" } else { "user" };
            serde_json::json!({
                "role": role,
                "parts": [{ "text": m.content }]
            })
        })
        .collect();

    let mut body = serde_json::json!({
        "contents": contents,
        "generationConfig": {
            "temperature": req.temperature.unwrap_or(0.2),
        }
    });
    // Thinking tokens count against maxOutputTokens; no default cap.
    if let Some(max_tokens) = req.max_tokens {
        body["generationConfig"]["maxOutputTokens"] = serde_json::json!(max_tokens);
    }
    if let Some(mime) = &req.response_mime_type {
        body["generationConfig"]["responseMimeType"] = serde_json::Value::String(mime.clone());
    }
    if let Some(sys) = system_text {
        body["systemInstruction"] = serde_json::json!({
            "parts": [{ "text": sys }]
        });
    }
    body
}

#[async_trait]
impl LlmBackend for VertexGeminiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let model = req.model.as_deref().unwrap_or(&self.model).to_string();
        let body = gemini_request_body(&req);

        let resp = self.credentials
            .authorize(self.client.post(self.endpoint(&model)))
            .json(&body)
            .send()
            .await?;
        let json = gcp::check_response_status(resp).await?;

        let content = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| LlmError::MalformedOutput("response has no candidate text".to_string()))?
            .to_string();

        Ok(LlmResponse {
            content,
            model,
            prompt_tokens:     json["usageMetadata"]["promptTokenCount"].as_u64().unwrap_or(0) as u32,
            completion_tokens: json["usageMetadata"]["candidatesTokenCount"].as_u64().unwrap_or(0) as u32,
        })
    }

    fn model_id(&self) -> &str { &self.model }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
