//! Google Cloud access shared by every REST collaborator.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{FormdeskError, Result};

/// OAuth2 bearer token read from the configured credential file.
///
/// The file holds either a JSON object with an `access_token` field or the
/// raw token text (e.g. the output of `gcloud auth print-access-token`).
#[derive(Clone)]
pub struct GcpCredentials {
    access_token: Arc<SecretString>,
}

#[derive(Deserialize)]
struct TokenFile {
    access_token: String,
}

impl GcpCredentials {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_contents(&raw)
    }

    pub fn from_contents(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let token = if trimmed.starts_with('{') {
            serde_json::from_str::<TokenFile>(trimmed)?.access_token
        } else {
            trimmed.to_string()
        };
        if token.trim().is_empty() {
            return Err(FormdeskError::Config("credential file contains no access token".to_string()));
        }
        Ok(Self { access_token: Arc::new(SecretString::from(token)) })
    }

    /// Attach the bearer token to an outbound request.
    pub fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(self.access_token.expose_secret())
    }
}

impl std::fmt::Debug for GcpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpCredentials").field("access_token", &"[REDACTED]").finish()
    }
}

/// HTTP client with an explicit request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Decode a Google REST error body into an API error, or hand back the JSON.
pub async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value> {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().await?;
    if status >= 400 {
        let message = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(FormdeskError::Api { status, message });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_json_file_contents() {
        let creds = GcpCredentials::from_contents(r#"{"access_token": "ya29.token", "expires_in": 3599}"#).unwrap();
        assert_eq!(creds.access_token.expose_secret(), "ya29.token");
    }

    #[test]
    fn test_token_from_raw_text() {
        let creds = GcpCredentials::from_contents("ya29.raw\n").unwrap();
        assert_eq!(creds.access_token.expose_secret(), "ya29.raw");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        assert!(GcpCredentials::from_contents("   \n").is_err());
        assert!(GcpCredentials::from_contents(r#"{"access_token": ""}"#).is_err());
    }

    #[test]
    fn test_debug_never_prints_token() {
        let creds = GcpCredentials::from_contents("ya29.secret").unwrap();
        assert!(!format!("{creds:?}").contains("ya29.secret"));
    }
}
