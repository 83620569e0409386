//! Request-scoped domain types shared by the explanation and web crates.

use serde::{Deserialize, Serialize};

/// Language every answer falls back to when the caller does not ask for one.
pub const DEFAULT_TARGET_LANG: &str = "fi";

/// Source language assumed when translating locally produced explanations.
pub const TRANSLATION_SOURCE_LANG: &str = "en";

/// Explanation text returned when the field endpoint cannot produce anything better.
pub const DEGRADED_EXPLANATION: &str = "Palvelu ei vastaa.";

/// One form field the user wants explained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldQuery {
    pub field_label: String,
    pub section_context: String,
    pub form_name: String,
    pub page_context: String,
    /// Raw language code from the caller; may be blank.
    pub target_lang: String,
}

impl FieldQuery {
    /// Target language with blanks resolved to [`DEFAULT_TARGET_LANG`].
    pub fn target_lang(&self) -> &str {
        let lang = self.target_lang.trim();
        if lang.is_empty() { DEFAULT_TARGET_LANG } else { lang }
    }
}

/// Canonical answer shape, whichever producer wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExplanation {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub tips: String,
}

impl FieldExplanation {
    pub fn new(
        explanation: impl Into<String>,
        action: impl Into<String>,
        example: impl Into<String>,
        tips: impl Into<String>,
    ) -> Self {
        Self {
            explanation: explanation.into(),
            action: action.into(),
            example: example.into(),
            tips: tips.into(),
        }
    }
}

/// Which producer answered a field request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    /// Generative model, already answering in the target language.
    CloudModel,
    /// Local keyword rules, written in Finnish.
    LocalRules,
}

impl ExplanationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationSource::CloudModel => "cloud_model",
            ExplanationSource::LocalRules => "local_rules",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// JSON body of `POST /analyze-field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub status: ResponseStatus,
    pub explanation_target_lang: String,
    pub instructions_target_lang: String,
    pub example_target_lang: String,
    pub tips_target_lang: String,
}

impl ResponsePayload {
    pub fn ok(explanation: FieldExplanation) -> Self {
        Self {
            status: ResponseStatus::Ok,
            explanation_target_lang: explanation.explanation,
            instructions_target_lang: explanation.action,
            example_target_lang: explanation.example,
            tips_target_lang: explanation.tips,
        }
    }

    /// Generic payload used when request handling fails unexpectedly.
    /// Still reports `ok` so the UI always has something to render.
    pub fn degraded() -> Self {
        Self {
            status: ResponseStatus::Ok,
            explanation_target_lang: DEGRADED_EXPLANATION.to_string(),
            instructions_target_lang: String::new(),
            example_target_lang: String::new(),
            tips_target_lang: String::new(),
        }
    }
}
