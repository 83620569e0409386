//! Shared application state for the web server.

use std::sync::Arc;

use formdesk_common::Config;
use formdesk_document::DocumentPipeline;
use formdesk_llm::router::ExplanationRouter;

/// Shared state injected into every Axum handler. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub explainer: ExplanationRouter,
    pub documents: DocumentPipeline,
}

impl AppState {
    pub fn new(config: Config, explainer: ExplanationRouter, documents: DocumentPipeline) -> Self {
        Self { config, explainer, documents }
    }

    /// Build every collaborator the configuration allows.
    pub fn from_config(config: Config) -> formdesk_common::Result<Self> {
        let credentials = config.google.load_credentials();
        let explainer = ExplanationRouter::from_config(&config.google, credentials.as_ref());
        let documents = DocumentPipeline::from_config(&config.google, credentials.as_ref())?;
        Ok(Self::new(config, explainer, documents))
    }

    /// Offline state: local rules, no translation, local page count.
    pub fn offline(config: Config) -> Self {
        let explainer = ExplanationRouter::new(None, Arc::new(formdesk_llm::translate::PassthroughTranslator));
        Self::new(config, explainer, DocumentPipeline::local())
    }
}

pub type SharedState = Arc<AppState>;
