//! Local PII prefilter for field-context snippets.
//!
//! Runs before any text is sent to the generative model. Whole documents go
//! through the external redaction service instead; this only covers the two
//! identifiers most likely to be typed into a field label.

use regex::Regex;
use std::sync::OnceLock;

/// Replacement for a Finnish personal identity code.
pub const IDENTITY_CODE_MASK: &str = "******-****";

/// Replacement for a Finnish IBAN.
pub const IBAN_MASK: &str = "FI** **** **** **** **";

fn identity_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // ppkkvv, century sign, individual number, check character
        Regex::new(r"\b\d{6}[-+A]\d{3}[0-9A-FHJ-NPR-Y]\b").unwrap()
    })
}

fn iban_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Ends on a digit so a trailing space stays with the following word.
    RE.get_or_init(|| Regex::new(r"\bFI[0-9 ]{13,}[0-9]\b").unwrap())
}

/// Replace identity codes and Finnish IBANs with fixed placeholders.
///
/// Each pattern is applied once across the whole string, identity codes
/// first. Text without either shape comes back unchanged.
pub fn mask_pii(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let masked = identity_code_regex().replace_all(text, IDENTITY_CODE_MASK);
    iban_regex().replace_all(&masked, IBAN_MASK).into_owned()
}
