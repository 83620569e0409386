//! HTTP handlers for all routes.

pub mod document;
pub mod field;
pub mod system;
