//! Redaction collaborator (Cloud DLP `content:deidentify`).

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use formdesk_common::gcp::{self, GcpCredentials};
use formdesk_common::{FormdeskError, Result};
use std::time::Duration;

/// Info types replaced with their type name before a document is processed.
pub const REDACTED_INFO_TYPES: &[&str] = &[
    "FINNISH_NATIONAL_ID",
    "IBAN_CODE",
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "PERSON_NAME",
];

#[async_trait]
pub trait Redactor: Send + Sync {
    async fn redact(&self, pdf_bytes: &[u8]) -> Result<Vec<u8>>;
}

pub struct DlpRedactor {
    pub project_id: String,
    credentials: GcpCredentials,
    client: reqwest::Client,
}

impl DlpRedactor {
    pub fn new(project_id: impl Into<String>, credentials: GcpCredentials, timeout: Duration) -> Result<Self> {
        Ok(Self {
            project_id: project_id.into(),
            credentials,
            client: gcp::http_client(timeout)?,
        })
    }
}

pub fn deidentify_request_body(pdf_bytes: &[u8]) -> serde_json::Value {
    let info_types: Vec<serde_json::Value> = REDACTED_INFO_TYPES
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();

    serde_json::json!({
        "inspectConfig": {
            "infoTypes": info_types,
            "includeQuote": false,
        },
        "deidentifyConfig": {
            "infoTypeTransformations": {
                "transformations": [{
                    "primitiveTransformation": { "replaceWithInfoTypeConfig": {} }
                }]
            }
        },
        "item": {
            "byteItem": {
                "type": "PDF",
                "data": BASE64.encode(pdf_bytes),
            }
        }
    })
}

#[async_trait]
impl Redactor for DlpRedactor {
    async fn redact(&self, pdf_bytes: &[u8]) -> Result<Vec<u8>> {
        let url = format!(
            "https://dlp.googleapis.com/v2/projects/{}/locations/global/content:deidentify",
            self.project_id
        );
        let resp = self.credentials
            .authorize(self.client.post(&url))
            .json(&deidentify_request_body(pdf_bytes))
            .send()
            .await?;
        let json = gcp::check_response_status(resp).await?;

        let data = json["item"]["byteItem"]["data"]
            .as_str()
            .ok_or_else(|| FormdeskError::Redaction("response has no byteItem data".to_string()))?;
        BASE64
            .decode(data)
            .map_err(|e| FormdeskError::Redaction(format!("invalid base64 in response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_lists_all_info_types() {
        let body = deidentify_request_body(b"%PDF");
        let names: Vec<&str> = body["inspectConfig"]["infoTypes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, REDACTED_INFO_TYPES);
        assert_eq!(body["inspectConfig"]["includeQuote"], false);
    }

    #[test]
    fn test_request_carries_base64_pdf() {
        let body = deidentify_request_body(b"%PDF");
        assert_eq!(body["item"]["byteItem"]["type"], "PDF");
        assert_eq!(body["item"]["byteItem"]["data"], "JVBERg==");
    }
}
