//! Explanation router: picks the cloud model or the local rules per request.
//!
//! Paths:
//!   cloud-capable    model configured; on any model failure fall back to the
//!                    local rules and translate like the offline path
//!   cloud-incapable  local rules, translated per field
//!
//! Unexpected failures above this layer are the web handler's concern.

use std::sync::Arc;
use std::time::Instant;

use formdesk_common::config::GoogleCloudConfig;
use formdesk_common::gcp::GcpCredentials;
use formdesk_common::{ExplanationSource, FieldExplanation, FieldQuery, ResponsePayload};

use crate::assembler::assemble;
use crate::audit::ExplanationAuditEntry;
use crate::backend::{LlmBackend, LlmError, VertexGeminiBackend};
use crate::fallback::{FieldCategory, FieldClassifier};
use crate::masking::mask_pii;
use crate::prompt::{build_request, parse_model_output, ModelInput};
use crate::translate::{CloudTranslator, PassthroughTranslator, Translator};

pub struct ExplanationRouter {
    model: Option<Arc<dyn LlmBackend>>,
    translator: Arc<dyn Translator>,
    classifier: FieldClassifier,
}

impl ExplanationRouter {
    pub fn new(model: Option<Arc<dyn LlmBackend>>, translator: Arc<dyn Translator>) -> Self {
        Self { model, translator, classifier: FieldClassifier::default() }
    }

    /// Build the collaborators the configuration allows. Anything missing
    /// degrades: no model means local rules, no translation project means
    /// untranslated local rules.
    pub fn from_config(google: &GoogleCloudConfig, credentials: Option<&GcpCredentials>) -> Self {
        let model: Option<Arc<dyn LlmBackend>> = match (google.cloud_model_enabled(), credentials, &google.project_id) {
            (true, Some(creds), Some(project)) => {
                match VertexGeminiBackend::new(project, &google.location, &google.model, creds.clone(), google.request_timeout()) {
                    Ok(b) => Some(Arc::new(b) as Arc<dyn LlmBackend>),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not build Vertex AI backend; using local rules");
                        None
                    }
                }
            }
            (true, None, _) => {
                tracing::warn!("Cloud model configured but credentials are unavailable; using local rules");
                None
            }
            _ => None,
        };

        let translator: Arc<dyn Translator> = match (google.translation_enabled(), credentials, &google.project_id) {
            (true, Some(creds), Some(project)) => {
                match CloudTranslator::new(project, creds.clone(), google.request_timeout()) {
                    Ok(t) => Arc::new(t) as Arc<dyn Translator>,
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not build translation client; answers stay untranslated");
                        Arc::new(PassthroughTranslator)
                    }
                }
            }
            _ => Arc::new(PassthroughTranslator),
        };

        tracing::info!(
            cloud_model = model.as_ref().map(|m| m.model_id()).unwrap_or("disabled"),
            "Explanation router ready"
        );
        Self::new(model, translator)
    }

    pub fn cloud_capable(&self) -> bool {
        self.model.is_some()
    }

    /// Answer one field request. Upstream failures never escape.
    pub async fn explain(&self, query: &FieldQuery) -> ResponsePayload {
        let started = Instant::now();
        let target_lang = query.target_lang();

        let answer = self.select(query, target_lang).await;

        ExplanationAuditEntry::new(
            answer.source,
            answer.model,
            answer.category,
            answer.prompt_tokens,
            answer.completion_tokens,
            target_lang,
            &answer.explanation.explanation,
            started.elapsed().as_millis() as u64,
        )
        .emit();

        assemble(answer.explanation, target_lang, answer.source, self.translator.as_ref()).await
    }

    async fn select(&self, query: &FieldQuery, target_lang: &str) -> Answer {
        let Some(model) = &self.model else {
            return self.local_answer(query);
        };

        match self.ask_model(model.as_ref(), query, target_lang).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(operation = "analyze_field", model = model.model_id(), error = %e, "Model call failed; using local rules");
                self.local_answer(query)
            }
        }
    }

    async fn ask_model(&self, model: &dyn LlmBackend, query: &FieldQuery, target_lang: &str) -> Result<Answer, LlmError> {
        let request = build_request(&ModelInput::from_query(query), target_lang)?;
        let response = model.complete(request).await?;
        Ok(Answer {
            explanation: parse_model_output(&response.content)?,
            source: ExplanationSource::CloudModel,
            model: Some(response.model),
            category: None,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
        })
    }

    /// Local rules see the masked label only.
    fn local_answer(&self, query: &FieldQuery) -> Answer {
        let label = mask_pii(&query.field_label);
        Answer {
            explanation: self.classifier.classify(&label, ""),
            source: ExplanationSource::LocalRules,
            model: None,
            category: Some(self.classifier.category(&label, "")),
            prompt_tokens: 0,
            completion_tokens: 0,
        }
    }
}

/// An explanation and the details its audit entry records.
struct Answer {
    explanation: FieldExplanation,
    source: ExplanationSource,
    model: Option<String>,
    category: Option<FieldCategory>,
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LlmRequest, LlmResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Result<&'static str, u16>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    impl ScriptedModel {
        fn replying(reply: &'static str) -> Self {
            Self { reply: Ok(reply), seen: Mutex::new(Vec::new()) }
        }

        fn failing(status: u16) -> Self {
            Self { reply: Err(status), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedModel {
        async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.seen.lock().unwrap().push(req);
            match self.reply {
                Ok(content) => Ok(LlmResponse {
                    content: content.to_string(),
                    model: "scripted".to_string(),
                    prompt_tokens: 42,
                    completion_tokens: 7,
                }),
                Err(status) => Err(LlmError::ApiError { status, message: "quota exceeded".to_string() }),
            }
        }
        fn model_id(&self) -> &str { "scripted" }
    }

    /// Tags every translated string so the test can tell which path ran.
    struct TaggingTranslator;

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(&self, text: &str, _source: Option<&str>, target: &str) -> Result<String, LlmError> {
            Ok(format!("[{target}] {text}"))
        }
    }

    fn query(label: &str, lang: &str) -> FieldQuery {
        FieldQuery { field_label: label.to_string(), target_lang: lang.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn test_offline_uses_local_rules() {
        let router = ExplanationRouter::new(None, Arc::new(PassthroughTranslator));
        assert!(!router.cloud_capable());
        let payload = router.explain(&query("Henkilötunnus", "")).await;
        assert!(payload.explanation_target_lang.contains("ppkkvv-xxxx"));
        assert_eq!(payload.example_target_lang, "131052-308T");
    }

    #[tokio::test]
    async fn test_offline_answers_are_translated() {
        let router = ExplanationRouter::new(None, Arc::new(TaggingTranslator));
        let payload = router.explain(&query("Postinumero", "sv")).await;
        assert_eq!(payload.example_target_lang, "[sv] 00100");
    }

    #[tokio::test]
    async fn test_cloud_answer_passes_through_untranslated() {
        let model = Arc::new(ScriptedModel::replying(
            r#"{"explanation": "Ange postnummer.", "action": "A", "example": "00100", "tips": "T"}"#,
        ));
        let router = ExplanationRouter::new(Some(model.clone() as Arc<dyn LlmBackend>), Arc::new(TaggingTranslator));
        let payload = router.explain(&query("Postinumero", "sv")).await;
        assert_eq!(payload.explanation_target_lang, "Ange postnummer.");
        assert_eq!(payload.example_target_lang, "00100");

        let seen = model.seen.lock().unwrap();
        assert!(seen[0].messages[1].content.starts_with("target_lang: sv"));
    }

    #[tokio::test]
    async fn test_model_sees_masked_label() {
        let model = Arc::new(ScriptedModel::replying(r#"{"explanation": "ok"}"#));
        let router = ExplanationRouter::new(Some(model.clone() as Arc<dyn LlmBackend>), Arc::new(PassthroughTranslator));
        router.explain(&query("Tunnus 131052-308T", "fi")).await;

        let seen = model.seen.lock().unwrap();
        let user = &seen[0].messages[1].content;
        assert!(!user.contains("131052-308T"));
        assert!(user.contains("******-****"));
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_and_translates() {
        let model = Arc::new(ScriptedModel::failing(429));
        let router = ExplanationRouter::new(Some(model as Arc<dyn LlmBackend>), Arc::new(TaggingTranslator));
        let payload = router.explain(&query("Henkilötunnus", "en")).await;
        assert_eq!(payload.example_target_lang, "[en] 131052-308T");
    }

    #[tokio::test]
    async fn test_malformed_model_output_falls_back() {
        let model = Arc::new(ScriptedModel::replying("Sorry, I cannot help with that."));
        let router = ExplanationRouter::new(Some(model as Arc<dyn LlmBackend>), Arc::new(PassthroughTranslator));
        let payload = router.explain(&query("", "fi")).await;
        assert!(payload.explanation_target_lang.starts_with("Kenttä on lomakkeen kenttä"));
    }

    #[tokio::test]
    async fn test_local_answer_records_category() {
        let router = ExplanationRouter::new(None, Arc::new(PassthroughTranslator));
        let answer = router.select(&query("Tilinumero", "fi"), "fi").await;
        assert_eq!(answer.source, ExplanationSource::LocalRules);
        assert_eq!(answer.category, Some(FieldCategory::BankAccount));
        assert_eq!(answer.model, None);
        assert_eq!((answer.prompt_tokens, answer.completion_tokens), (0, 0));
    }

    #[tokio::test]
    async fn test_cloud_answer_records_token_usage() {
        let model = Arc::new(ScriptedModel::replying(r#"{"explanation": "ok"}"#));
        let router = ExplanationRouter::new(Some(model as Arc<dyn LlmBackend>), Arc::new(PassthroughTranslator));
        let answer = router.select(&query("Tilinumero", "fi"), "fi").await;
        assert_eq!(answer.source, ExplanationSource::CloudModel);
        assert_eq!(answer.category, None);
        assert_eq!(answer.model.as_deref(), Some("scripted"));
        assert_eq!((answer.prompt_tokens, answer.completion_tokens), (42, 7));
    }

    #[test]
    fn test_from_config_without_cloud_is_offline() {
        let router = ExplanationRouter::from_config(&GoogleCloudConfig::default(), None);
        assert!(!router.cloud_capable());
    }

    #[test]
    fn test_from_config_with_credentials_is_cloud_capable() {
        let google = GoogleCloudConfig {
            project_id: Some("demo-project".to_string()),
            credentials_path: Some("/tmp/token".into()),
            ..Default::default()
        };
        let creds = GcpCredentials::from_contents("ya29.test").unwrap();
        assert!(ExplanationRouter::from_config(&google, Some(&creds)).cloud_capable());
        assert!(!ExplanationRouter::from_config(&google, None).cloud_capable());
    }
}
