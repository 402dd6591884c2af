//! Response text normalizer: isolates the JSON object inside raw model output.

use crate::resume::ParsingError;

/// Strips code fences and surrounding prose, returning the span from the
/// first `{` to the last `}`.
///
/// When the response holds several top-level objects the outermost braces
/// win; that is a single-object assumption, not JSON repair.
pub fn isolate_json_object(raw: &str) -> Result<&str, ParsingError> {
    let text = strip_code_fences(raw);

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ParsingError::UnparsableResponse);
    };
    if end < start {
        return Err(ParsingError::UnparsableResponse);
    }

    Ok(&text[start..=end])
}

/// Strips a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Language tag, if any, runs up to the first non-alphanumeric char.
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
