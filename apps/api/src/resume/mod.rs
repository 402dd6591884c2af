// Resume parsing: turns raw model output into a validated `ResumeRecord`.
//
// Flow: isolate JSON → decode → merge defaults → coerce → reconcile
//       hyperlinks → validate. Pure and synchronous; the LLM call and document
//       extraction happen before `parse_model_output` is invoked.

pub mod coercion;
pub mod handlers;
pub mod hyperlinks;
pub mod ingest;
pub mod merge;
pub mod normalizer;
pub mod prompts;
pub mod schema;
pub mod validation;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use schema::{HyperlinkHint, ResumeRecord};

/// One field that failed strict validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path with list indices, e.g. `work_experience[0].responsibilities[1]`.
    pub path: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("empty or unparsable response")]
    UnparsableResponse,

    #[error("invalid JSON in model response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("schema validation failed: {}", summarize(.0))]
    SchemaViolation(Vec<FieldViolation>),
}

impl ParsingError {
    /// Field-level diagnostics, empty for the non-schema variants.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ParsingError::SchemaViolation(violations) => violations,
            _ => &[],
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Converts raw model output into a validated record.
///
/// `hints` are the (display text, URL) pairs harvested from the source
/// document; pass an empty slice when none are available.
pub fn parse_model_output(
    raw_model_output: &str,
    hints: &[HyperlinkHint],
) -> Result<ResumeRecord, ParsingError> {
    let json_text = normalizer::isolate_json_object(raw_model_output)?;
    debug!(
        raw_len = raw_model_output.len(),
        json_len = json_text.len(),
        "isolated JSON object"
    );

    let parsed = match serde_json::from_str::<Value>(json_text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(ParsingError::SchemaViolation(vec![FieldViolation::new(
                "$",
                "expected a JSON object at the top level",
            )]))
        }
        Err(e) => {
            warn!(error = %e, "model response is not valid JSON");
            return Err(ParsingError::MalformedJson(e));
        }
    };

    let mut record = merge::merge_defaults(parsed);
    coercion::coerce_record(&mut record);
    hyperlinks::reconcile(&mut record, hints);

    validation::validate(record).inspect_err(|e| {
        warn!(violations = e.violations().len(), "parsed resume failed validation");
    })
}
