//! Turns a [`FieldExplanation`] into the externally visible payload.

use formdesk_common::entities::{DEFAULT_TARGET_LANG, TRANSLATION_SOURCE_LANG};
use formdesk_common::{ExplanationSource, FieldExplanation, ResponsePayload};

use crate::translate::Translator;

/// Cloud-model answers are already in `target_lang` and pass through verbatim.
/// Local-rule answers are translated field by field; a field whose
/// translation fails keeps its original text.
pub async fn assemble(
    explanation: FieldExplanation,
    target_lang: &str,
    source: ExplanationSource,
    translator: &dyn Translator,
) -> ResponsePayload {
    if source == ExplanationSource::CloudModel {
        return ResponsePayload::ok(explanation);
    }

    let target_lang = match target_lang.trim() {
        "" => DEFAULT_TARGET_LANG,
        lang => lang,
    };

    let FieldExplanation { explanation, action, example, tips } = explanation;
    ResponsePayload::ok(FieldExplanation {
        explanation: translate_field("explanation", explanation, target_lang, translator).await,
        action:      translate_field("action", action, target_lang, translator).await,
        example:     translate_field("example", example, target_lang, translator).await,
        tips:        translate_field("tips", tips, target_lang, translator).await,
    })
}

async fn translate_field(
    field: &str,
    text: String,
    target_lang: &str,
    translator: &dyn Translator,
) -> String {
    if text.is_empty() {
        return text;
    }
    match translator.translate(&text, Some(TRANSLATION_SOURCE_LANG), target_lang).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!(operation = "translate", field, target_lang, error = %e, "Translation failed; keeping original text");
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Upper-cases text and fails for one chosen input.
    struct FlakyTranslator {
        fail_on: &'static str,
        calls: Mutex<Vec<(String, Option<String>, String)>>,
    }

    impl FlakyTranslator {
        fn new(fail_on: &'static str) -> Self {
            Self { fail_on, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl Translator for FlakyTranslator {
        async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push((text.to_string(), source.map(str::to_string), target.to_string()));
            if text == self.fail_on {
                return Err(LlmError::Unavailable("translation quota exceeded".to_string()));
            }
            Ok(text.to_uppercase())
        }
    }

    fn sample() -> FieldExplanation {
        FieldExplanation::new("explain", "act", "ex", "tip")
    }

    #[tokio::test]
    async fn test_cloud_answers_pass_through() {
        let translator = FlakyTranslator::new("");
        let payload = assemble(sample(), "sv", ExplanationSource::CloudModel, &translator).await;
        assert_eq!(payload.explanation_target_lang, "explain");
        assert_eq!(payload.tips_target_lang, "tip");
        assert!(translator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_answers_translated_per_field() {
        let translator = FlakyTranslator::new("ex");
        let payload = assemble(sample(), "sv", ExplanationSource::LocalRules, &translator).await;
        assert_eq!(payload.explanation_target_lang, "EXPLAIN");
        assert_eq!(payload.instructions_target_lang, "ACT");
        assert_eq!(payload.example_target_lang, "ex");
        assert_eq!(payload.tips_target_lang, "TIP");

        let calls = translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, src, tgt)| src.as_deref() == Some("en") && tgt == "sv"));
    }

    #[tokio::test]
    async fn test_blank_target_defaults_to_finnish() {
        let translator = FlakyTranslator::new("");
        assemble(sample(), " ", ExplanationSource::LocalRules, &translator).await;
        assert!(translator.calls.lock().unwrap().iter().all(|(_, _, tgt)| tgt == "fi"));
    }

    #[tokio::test]
    async fn test_empty_fields_are_not_sent() {
        let translator = FlakyTranslator::new("");
        let explanation = FieldExplanation::new("explain", "", "", "");
        let payload = assemble(explanation, "en", ExplanationSource::LocalRules, &translator).await;
        assert_eq!(payload.instructions_target_lang, "");
        assert_eq!(translator.calls.lock().unwrap().len(), 1);
    }
}
