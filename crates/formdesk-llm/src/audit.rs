//! Audit logging for answered field requests.
//! Entries go to the tracing log only; nothing is persisted.

use chrono::Utc;
use formdesk_common::ExplanationSource;

use crate::fallback::FieldCategory;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationAuditEntry {
    pub id: Uuid,
    pub source: ExplanationSource,
    /// Model id when the cloud model answered.
    pub model: Option<String>,
    /// Matched rule when the local rules answered.
    pub category: Option<String>,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub target_lang: String,
    /// SHA-256 of the explanation text, so answers can be compared without logging them.
    pub output_hash: String,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl ExplanationAuditEntry {
    pub fn new(
        source: ExplanationSource,
        model: Option<String>,
        category: Option<FieldCategory>,
        prompt_tokens: u32,
        completion_tokens: u32,
        target_lang: &str,
        output: &str,
        latency_ms: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(output.as_bytes());
        let output_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            source,
            model,
            category: category.map(|c| c.as_str().to_string()),
            prompt_tokens,
            completion_tokens,
            target_lang: target_lang.to_string(),
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }

    pub fn emit(&self) {
        tracing::info!(
            audit_id = %self.id,
            source = self.source.as_str(),
            model = self.model.as_deref().unwrap_or("-"),
            category = self.category.as_deref().unwrap_or("-"),
            prompt_tokens = self.prompt_tokens,
            completion_tokens = self.completion_tokens,
            target_lang = %self.target_lang,
            output_hash = %self.output_hash,
            latency_ms = self.latency_ms,
            "Field explanation served"
        );
    }
}
