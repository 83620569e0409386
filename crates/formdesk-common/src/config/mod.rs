//! Configuration loading for Formdesk.
//! Reads formdesk.toml from the current directory or the path in FORMDESK_CONFIG,
//! then lets environment variables (and a `.env` file) override individual keys.


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FormdeskError, Result};
use crate::gcp::GcpCredentials;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleCloudConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCloudConfig {
    pub project_id: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    pub docai_processor_id: Option<String>,
    #[serde(default = "default_docai_location")]
    pub docai_location: String,
    /// File holding the OAuth2 access token used for every Google call.
    pub credentials_path: Option<PathBuf>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_location()        -> String { "europe-north1".to_string() }
fn default_docai_location()  -> String { "eu".to_string() }
fn default_model()           -> String { "gemini-2.5-flash".to_string() }
fn default_request_timeout() -> u64    { 30 }

impl Default for GoogleCloudConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: default_location(),
            docai_processor_id: None,
            docai_location: default_docai_location(),
            credentials_path: None,
            model: default_model(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

fn default_bind()       -> String  { "0.0.0.0:8080".to_string() }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_max_upload() -> usize   { 20 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl Config {
    /// Load `.env`, the optional TOML file, then environment overrides.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {e}");
        }

        let path = std::env::var("FORMDESK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("formdesk.toml"));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| FormdeskError::Config(e.to_string()))
    }

    /// Apply environment-style overrides. Blank values count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let google = &mut self.google;
        if let Some(v) = get("PROJECT_ID") { google.project_id = Some(v); }
        if let Some(v) = get("LOCATION") { google.location = v; }
        if let Some(v) = get("DOCAI_PROCESSOR_ID") { google.docai_processor_id = Some(v); }
        if let Some(v) = get("DOCAI_LOCATION") { google.docai_location = v; }
        if let Some(v) = get("GOOGLE_APPLICATION_CREDENTIALS") { google.credentials_path = Some(PathBuf::from(v)); }
        if let Some(v) = get("VERTEX_MODEL").or_else(|| get("GEMINI_MODEL")) { google.model = v; }
        if let Some(v) = get("FORMDESK_REQUEST_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => google.request_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring non-numeric FORMDESK_REQUEST_TIMEOUT_SECS={v}"),
            }
        }

        let server = &mut self.server;
        if let Some(v) = get("FORMDESK_BIND") { server.bind = v; }
        if let Some(v) = get("FORMDESK_STATIC_DIR") { server.static_dir = PathBuf::from(v); }
    }
}

impl GoogleCloudConfig {
    fn project(&self) -> Option<&str> {
        self.project_id.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Project, credentials and model are all present.
    pub fn cloud_model_enabled(&self) -> bool {
        self.project().is_some() && self.credentials_path.is_some() && !self.model.trim().is_empty()
    }

    pub fn translation_enabled(&self) -> bool {
        self.project().is_some()
    }

    pub fn redaction_enabled(&self) -> bool {
        self.project().is_some()
    }

    pub fn document_ai_enabled(&self) -> bool {
        self.docai_processor_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Read the credential file, if one is configured. A missing or unreadable
    /// file is logged and treated as "no credentials".
    pub fn load_credentials(&self) -> Option<GcpCredentials> {
        let path = self.credentials_path.as_ref()?;
        match GcpCredentials::from_file(path) {
            Ok(creds) => Some(creds),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not load Google credentials; cloud services disabled");
                None
            }
        }
    }
}
