//! Validation gate: strict schema check of the coerced, reconciled record.
//!
//! Collects every violation rather than stopping at the first, then hands the
//! clean value to serde for the typed conversion. Nothing is repaired here.

use serde_json::{Map, Value};

use crate::resume::coercion::has_http_scheme;
use crate::resume::schema::{FieldKind, FieldSpec, ResumeRecord, RESUME_FIELDS};
use crate::resume::{FieldViolation, ParsingError};

/// Validates the record against the schema and converts it to `ResumeRecord`.
pub fn validate(record: Map<String, Value>) -> Result<ResumeRecord, ParsingError> {
    let violations = collect_violations(&record);
    if !violations.is_empty() {
        return Err(ParsingError::SchemaViolation(violations));
    }

    serde_json::from_value(Value::Object(record)).map_err(|e| {
        ParsingError::SchemaViolation(vec![FieldViolation::new("$", e.to_string())])
    })
}

/// Every schema violation in the record, in document order.
pub fn collect_violations(record: &Map<String, Value>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_section(RESUME_FIELDS, record, "", true, &mut violations);
    violations
}

fn check_section(
    fields: &[FieldSpec],
    section: &Map<String, Value>,
    path: &str,
    keys_required: bool,
    violations: &mut Vec<FieldViolation>,
) {
    for key in section.keys() {
        if !fields.iter().any(|spec| spec.name == key) {
            violations.push(FieldViolation::new(join(path, key), "unknown field"));
        }
    }

    for spec in fields {
        let field_path = join(path, spec.name);
        match section.get(spec.name) {
            Some(value) => check_field(spec, value, &field_path, violations),
            // Entry items may omit keys; they deserialize to defaults.
            None if keys_required => violations.push(FieldViolation::new(field_path, "missing field")),
            None => {}
        }
    }
}

fn check_field(spec: &FieldSpec, value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    match spec.kind {
        FieldKind::Text | FieldKind::EndDate => {
            if !matches!(value, Value::Null | Value::String(_)) {
                violations.push(type_mismatch(path, "string or null", value));
            }
        }
        FieldKind::StartDate => match value {
            Value::Null => {}
            Value::String(s) if s.trim().eq_ignore_ascii_case("present") => {
                violations.push(FieldViolation::new(
                    path,
                    "\"Present\" is only valid as an end date",
                ));
            }
            Value::String(_) => {}
            other => violations.push(type_mismatch(path, "string or null", other)),
        },
        FieldKind::Link => match value {
            Value::Null => {}
            Value::String(s) if has_http_scheme(s) => {}
            Value::String(s) => violations.push(FieldViolation::new(
                path,
                format!("expected an absolute http(s) URL or null, found \"{s}\""),
            )),
            other => violations.push(type_mismatch(path, "URL string or null", other)),
        },
        FieldKind::TextList => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        violations.push(type_mismatch(&format!("{path}[{i}]"), "string", item));
                    }
                }
            }
            other => violations.push(type_mismatch(path, "list of strings", other)),
        },
        FieldKind::Section(nested) => match value {
            Value::Object(map) => check_section(nested, map, path, true, violations),
            other => violations.push(type_mismatch(path, "object", other)),
        },
        FieldKind::Entries(nested) => match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    match item {
                        Value::Object(map) => check_section(nested, map, &item_path, false, violations),
                        other => violations.push(type_mismatch(&item_path, "object", other)),
                    }
                }
            }
            other => violations.push(type_mismatch(path, "list of objects", other)),
        },
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn type_mismatch(path: &str, expected: &str, found: &Value) -> FieldViolation {
    FieldViolation::new(path, format!("expected {expected}, found {}", type_name(found)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::schema::default_skeleton;
    use serde_json::json;

    fn skeleton_with(patch: impl FnOnce(&mut Map<String, Value>)) -> Map<String, Value> {
        let mut record = default_skeleton().clone();
        patch(&mut record);
        record
    }

    fn paths(err: ParsingError) -> Vec<String> {
        match err {
            ParsingError::SchemaViolation(violations) => {
                violations.into_iter().map(|v| v.path).collect()
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn test_skeleton_validates_to_default_record() {
        let record = validate(default_skeleton().clone()).unwrap();
        assert_eq!(record, ResumeRecord::default());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let record = skeleton_with(|r| {
            r.insert("hobbies".into(), json!(["chess"]));
        });
        assert_eq!(paths(validate(record).unwrap_err()), vec!["hobbies"]);
    }

    #[test]
    fn test_unknown_nested_key_rejected() {
        let record = skeleton_with(|r| {
            r["personal_information"]["twitter"] = json!("@jane");
            r["education"] = json!([{"institution": "MIT", "honors": "cum laude"}]);
        });
        let paths = paths(validate(record).unwrap_err());
        assert!(paths.contains(&"personal_information.twitter".to_string()));
        assert!(paths.contains(&"education[0].honors".to_string()));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let record = skeleton_with(|r| {
            r["skills"]["languages"] = json!(["Rust", {"name": "Go"}, 1]);
            r["personal_information"]["github"] = json!("janedoe");
            r["professional_summary"] = json!(["not", "text"]);
            r["work_experience"] = json!(["Acme"]);
        });
        let paths = paths(validate(record).unwrap_err());
        assert_eq!(
            paths,
            vec![
                "personal_information.github",
                "professional_summary",
                "work_experience[0]",
                "skills.languages[1]",
                "skills.languages[2]",
            ]
        );
    }

    #[test]
    fn test_missing_section_key_reported() {
        let record = skeleton_with(|r| {
            r.remove("skills");
        });
        assert_eq!(paths(validate(record).unwrap_err()), vec!["skills"]);
    }

    #[test]
    fn test_entry_items_may_omit_keys() {
        let record = skeleton_with(|r| {
            r["projects"] = json!([{"name": "Crawler"}]);
        });
        let parsed = validate(record).unwrap();
        assert_eq!(parsed.projects[0].name.as_deref(), Some("Crawler"));
        assert!(parsed.projects[0].technologies.is_empty());
        assert_eq!(parsed.projects[0].link, None);
    }

    #[test]
    fn test_present_only_valid_as_end_date() {
        let ok = skeleton_with(|r| {
            r["work_experience"] = json!([{"start_date": "2021", "end_date": "Present"}]);
        });
        assert!(validate(ok).is_ok());

        let bad = skeleton_with(|r| {
            r["work_experience"] = json!([{"start_date": "Present", "end_date": null}]);
        });
        assert_eq!(
            paths(validate(bad).unwrap_err()),
            vec!["work_experience[0].start_date"]
        );
    }

    #[test]
    fn test_links_must_be_absolute() {
        let ok = skeleton_with(|r| {
            r["personal_information"]["linkedin"] = json!("https://linkedin.com/in/jane");
            r["projects"] = json!([{"link": "http://crawler.dev"}]);
        });
        assert!(validate(ok).is_ok());

        let bad = skeleton_with(|r| {
            r["projects"] = json!([{"link": "crawler.dev"}]);
        });
        assert_eq!(paths(validate(bad).unwrap_err()), vec!["projects[0].link"]);
    }

    #[test]
    fn test_wrong_section_type_rejected_not_coerced() {
        let record = skeleton_with(|r| {
            r["skills"] = json!(["Rust"]);
        });
        let err = validate(record).unwrap_err();
        match err {
            ParsingError::SchemaViolation(v) => {
                assert_eq!(v[0].path, "skills");
                assert_eq!(v[0].reason, "expected object, found list");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
