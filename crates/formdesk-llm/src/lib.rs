//! formdesk-llm: field explanation engine.
//!
//! Masks PII in field context, asks the generative model when one is
//! configured, and falls back to the local keyword rules otherwise. The
//! router picks the path per request and hands the result to the assembler.

pub mod assembler;
pub mod audit;
pub mod backend;
pub mod fallback;
pub mod masking;
pub mod prompt;
pub mod router;
pub mod translate;
