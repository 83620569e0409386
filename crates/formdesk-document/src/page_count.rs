//! Local stand-in for the document-structure service.
//!
//! Counts `/Type /Page` object markers in the raw PDF bytes so the frontend
//! can be exercised without Document AI. `/Type /Pages` (the page tree node)
//! is not counted.

use regex::bytes::Regex;
use std::sync::OnceLock;

pub const FALLBACK_TEXT: &str = "DocAI disabled (fallback)";

fn page_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u)/Type\s*/Page\b").unwrap())
}

/// Number of page objects, never less than one.
pub fn count_pages(pdf_bytes: &[u8]) -> usize {
    page_marker_regex().find_iter(pdf_bytes).count().max(1)
}

/// Document-shaped summary with one empty page object per counted page.
pub fn fallback_summary(pdf_bytes: &[u8]) -> serde_json::Value {
    let pages: Vec<serde_json::Value> = (0..count_pages(pdf_bytes))
        .map(|_| serde_json::json!({}))
        .collect();
    serde_json::json!({
        "pages": pages,
        "text": FALLBACK_TEXT,
    })
}
