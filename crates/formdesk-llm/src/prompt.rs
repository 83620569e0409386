//! Prompt construction and output parsing for the field explanation model.

use formdesk_common::{FieldExplanation, FieldQuery};
use serde::Serialize;

use crate::backend::{LlmError, LlmRequest, Message};
use crate::masking::mask_pii;

pub const SYSTEM_PROMPT: &str = r#"
You are a helpful assistant specialized in explaining fields in official forms.
You MUST answer in the language specified by `target_lang`.
Return ONLY a JSON object in that language with these keys:
{
  "explanation": "Selkokielinen ohje kentän täyttämiseen.",
  "action": "Miksi tätä kysytään / miksi tieto on tarpeen.",
  "example": "Yksi konkreettinen esimerkki, joka sopii kenttään.",
  "tips": "Lyhyet vinkit kentän täyttöön."
}
"#;

/// Field context as sent to the model. Every free-text field is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInput {
    pub field_label: String,
    pub section_context: String,
    pub form_name: String,
    pub page_context: String,
    pub form_language: String,
}

impl ModelInput {
    pub fn from_query(query: &FieldQuery) -> Self {
        Self {
            field_label: mask_pii(&query.field_label),
            section_context: mask_pii(&query.section_context),
            form_name: mask_pii(&query.form_name),
            page_context: mask_pii(&query.page_context),
            form_language: "detected".to_string(),
        }
    }
}

pub fn build_request(input: &ModelInput, target_lang: &str) -> Result<LlmRequest, LlmError> {
    let user_message = format!(
        "target_lang: {target_lang}\nHere is the form field data as JSON: {}",
        serde_json::to_string(input)?
    );
    Ok(LlmRequest {
        messages: vec![Message::system(SYSTEM_PROMPT), Message::user(user_message)],
        model: None,
        max_tokens: None,
        temperature: None,
        response_mime_type: Some("application/json".to_string()),
    })
}

/// Parse the model's JSON answer. Tolerates a surrounding Markdown code fence.
pub fn parse_model_output(content: &str) -> Result<FieldExplanation, LlmError> {
    let body = strip_code_fence(content.trim());
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(LlmError::MalformedOutput(format!("expected a JSON object, got: {value}")));
    }
    Ok(serde_json::from_value(value)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
