//! formdesk-common: Shared types, errors, and configuration used across all Formdesk crates.

pub mod config;
pub mod entities;
pub mod error;
pub mod gcp;

// Re-export commonly used types
pub use config::Config;
pub use entities::{
    ExplanationSource, FieldExplanation, FieldQuery, ResponsePayload, ResponseStatus,
};
pub use error::{FormdeskError, Result};
