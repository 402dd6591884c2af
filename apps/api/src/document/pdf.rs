use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::document::{ExtractedDocument, ExtractionError};
use crate::resume::HyperlinkHint;

/// Absolute URLs, plus scheme-less LinkedIn/GitHub/www references.
const URL_PATTERN: &str = r#"(?i)\b(?:https?://[^\s<>()"']+|(?:www\.)?(?:linkedin\.com|github\.com)/[^\s<>()"']+|www\.[a-z0-9-]+(?:\.[a-z0-9-]+)+[^\s<>()"']*)"#;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern compiles"))
}

/// Extracts PDF text. Link annotations are not read; URL-shaped tokens in the
/// text stand in as hints, with the token itself as display text.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let text = text.trim().to_string();
    let hints = harvest_url_hints(&text);

    debug!(
        text_len = text.len(),
        hints = hints.len(),
        "extracted PDF text"
    );
    Ok(ExtractedDocument { text, hints })
}

pub fn harvest_url_hints(text: &str) -> Vec<HyperlinkHint> {
    let mut seen = HashSet::new();
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .filter(|token| seen.insert(token.to_ascii_lowercase()))
        .map(|token| HyperlinkHint::new(token, token))
        .collect()
}
