use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormdeskError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Redaction error: {0}")]
    Redaction(String),

    #[error("Document processing error: {0}")]
    Document(String),

    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, FormdeskError>;
