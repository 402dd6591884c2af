//! Field coercion: deterministic, non-failing repairs of the shape mismatches
//! models are known to emit. Nothing here returns an error: values that
//! cannot be interpreted degrade to a safe default. Only wrong-typed sections
//! and non-object entries are left for the validation gate to judge.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::resume::schema::{default_value, FieldKind, FieldSpec, RESUME_FIELDS};

/// Keys whose value reads as the "title" of a structured list entry.
const NAME_KEYS: &[&str] = &[
    "name",
    "title",
    "award_name",
    "award",
    "certification_name",
    "certification",
    "skill",
    "language",
    "label",
    "text",
    "value",
];

/// Keys whose value reads as the "detail" of a structured list entry.
const DESCRIPTION_KEYS: &[&str] = &["description", "details", "detail", "summary"];

/// A raw JSON value, classified once before a coercion rule looks at it.
#[derive(Debug)]
pub enum Shape {
    Text(String),
    Object(Map<String, Value>),
    Other(Value),
}

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Shape::Text(s),
            Value::Object(map) => Shape::Object(map),
            other => Shape::Other(other),
        }
    }
}

/// Applies every coercion rule to a merged record in place.
pub fn coerce_record(record: &mut Map<String, Value>) {
    coerce_section(RESUME_FIELDS, record);
}

fn coerce_section(fields: &[FieldSpec], section: &mut Map<String, Value>) {
    for spec in fields {
        if let Some(slot) = section.get_mut(spec.name) {
            coerce_field(spec, slot);
        }
    }
}

fn coerce_field(spec: &FieldSpec, slot: &mut Value) {
    match spec.kind {
        FieldKind::Text | FieldKind::StartDate | FieldKind::EndDate => {
            coerce_scalar_text(spec.name, slot)
        }
        FieldKind::Link => scrub_link(spec.name, slot),
        FieldKind::TextList => coerce_text_list(spec.name, slot),
        FieldKind::Section(nested) => match slot {
            Value::Object(map) => coerce_section(nested, map),
            Value::Null => *slot = default_value(spec.kind),
            _ => {}
        },
        FieldKind::Entries(nested) => match slot {
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::Object(map) = item {
                        coerce_section(nested, map);
                    }
                }
            }
            Value::Null => *slot = default_value(spec.kind),
            _ => {}
        },
    }
}

/// Numbers and booleans in free-text fields become their string rendering.
/// Objects collapse to their readable parts; lists and unreadable objects
/// become null so one bad field cannot sink the record.
fn coerce_scalar_text(name: &str, slot: &mut Value) {
    match slot {
        Value::Null | Value::String(_) => {}
        Value::Number(n) => *slot = Value::String(n.to_string()),
        Value::Bool(b) => *slot = Value::String(b.to_string()),
        Value::Object(map) => {
            let text = collapse_scalar_object(map);
            warn!(field = name, collapsed = text.is_some(), "collapsing object in text field");
            *slot = text.map_or(Value::Null, Value::String);
        }
        Value::Array(_) => {
            warn!(field = name, "dropping list in text field");
            *slot = Value::Null;
        }
    }
}

/// `{"value": 3.8, "scale": 4}` → `3.8`, `{"city": "Berlin", "country": "DE"}` → `Berlin, DE`.
fn collapse_scalar_object(map: &Map<String, Value>) -> Option<String> {
    let name = first_text(map, NAME_KEYS);
    let description = first_text(map, DESCRIPTION_KEYS);
    match (name, description) {
        (Some(name), Some(description)) => return Some(format!("{name} - {description}")),
        (Some(text), None) | (None, Some(text)) => return Some(text),
        (None, None) => {}
    }

    let parts: Vec<String> = map
        .values()
        .filter_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn coerce_text_list(name: &str, slot: &mut Value) {
    let value = std::mem::take(slot);
    *slot = match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter_map(|item| collapse_to_text(item).map(Value::String))
                .collect(),
        ),
        Value::Null => Value::Array(Vec::new()),
        Value::String(s) => {
            debug!(field = name, "wrapping bare string in a list");
            Value::Array(vec![Value::String(s)])
        }
        other => {
            warn!(field = name, "wrapping single value in a list");
            Value::Array(collapse_to_text(other).map(Value::String).into_iter().collect())
        }
    };
}

/// Collapses one list element into a plain string. `None` drops the element.
pub fn collapse_to_text(item: Value) -> Option<String> {
    match Shape::from(item) {
        Shape::Text(s) => Some(s),
        Shape::Object(map) => Some(collapse_object(map)),
        Shape::Other(Value::Null) => None,
        Shape::Other(other) => Some(other.to_string()),
    }
}

fn collapse_object(map: Map<String, Value>) -> String {
    let name = first_text(&map, NAME_KEYS);
    let description = first_text(&map, DESCRIPTION_KEYS);

    match (name, description) {
        (Some(name), Some(description)) => format!("{name} - {description}"),
        (Some(text), None) | (None, Some(text)) => text,
        (None, None) => Value::Object(map).to_string(),
    }
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Resets link fields that cannot become an absolute http(s) URL to null.
///
/// Bare domains (`github.com/jane`, `jane.dev`) survive so reconciliation can
/// add the scheme; handles and placeholders (`janedoe`, `N/A`) do not.
fn scrub_link(name: &str, slot: &mut Value) {
    let keep = match slot {
        Value::Null => return,
        Value::String(s) => {
            let trimmed = s.trim().to_string();
            let keep = has_http_scheme(&trimmed) || is_bare_domain(&trimmed);
            *s = trimmed;
            keep
        }
        _ => false,
    };

    if !keep {
        warn!(field = name, value = %slot, "dropping link that is not a URL");
        *slot = Value::Null;
    }
}

pub fn has_http_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("http://") && lower.len() > "http://".len())
        || (lower.starts_with("https://") && lower.len() > "https://".len())
}

/// `host.tld[/path]` with no scheme and no whitespace.
pub fn is_bare_domain(value: &str) -> bool {
    if value.is_empty() || value.contains("://") || value.chars().any(char::is_whitespace) {
        return false;
    }
    // mailto:, tel: and similar
    if value.contains(':') && !value.contains('/') {
        return false;
    }
    let host = value.split(['/', '?', '#']).next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    let Some((labels, tld)) = host.rsplit_once('.') else {
        return false;
    };
    !labels.is_empty()
        && !labels.contains('@')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
