//! formdesk-document: uploaded form analysis.
//!
//! Upload → redaction service → document-structure service, or a local
//! page-count summary when no processor is configured.

pub mod page_count;
pub mod pipeline;
pub mod redaction;
pub mod structure;

pub use pipeline::{DocumentAnalysis, DocumentPipeline};
