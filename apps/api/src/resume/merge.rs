//! Default merge: lays parsed model output over the default skeleton.

use serde_json::{Map, Value};

use crate::resume::schema::{default_skeleton, FieldKind, FieldSpec, RESUME_FIELDS};

/// Merges `input` into a fresh clone of the default skeleton.
///
/// Walks the schema, not the input: every declared key ends up present.
/// Sections given as objects merge key-wise; any other present value
/// (list, scalar, or a wrong-typed section) replaces the default as-is and
/// is left for coercion and validation. Undeclared keys are carried over
/// unchanged so validation can reject them.
pub fn merge_defaults(input: Map<String, Value>) -> Map<String, Value> {
    merge_section(RESUME_FIELDS, default_skeleton().clone(), input)
}

fn merge_section(
    fields: &[FieldSpec],
    mut base: Map<String, Value>,
    mut input: Map<String, Value>,
) -> Map<String, Value> {
    for spec in fields {
        let Some(value) = input.remove(spec.name) else {
            continue;
        };

        let merged = match (spec.kind, value) {
            (FieldKind::Section(nested), Value::Object(object)) => {
                let nested_base = match base.remove(spec.name) {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                Value::Object(merge_section(nested, nested_base, object))
            }
            (_, value) => value,
        };
        base.insert(spec.name.to_string(), merged);
    }

    base.extend(input);
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn assert_complete(merged: &Map<String, Value>, fields: &[FieldSpec], path: &str) {
        for spec in fields {
            let value = merged
                .get(spec.name)
                .unwrap_or_else(|| panic!("{path}.{} missing", spec.name));
            if let (FieldKind::Section(nested), Value::Object(map)) = (spec.kind, value) {
                assert_complete(map, nested, &format!("{path}.{}", spec.name));
            }
        }
    }

    #[test]
    fn test_merge_skeleton_into_itself_is_identity() {
        let skeleton = default_skeleton().clone();
        assert_eq!(merge_defaults(skeleton.clone()), skeleton);
    }

    #[test]
    fn test_empty_input_yields_skeleton() {
        let merged = merge_defaults(Map::new());
        assert_eq!(&merged, default_skeleton());
        assert_complete(&merged, RESUME_FIELDS, "$");
    }

    #[test]
    fn test_partial_nested_section_is_merged_not_replaced() {
        let merged = merge_defaults(object(json!({
            "personal_information": {"full_name": "Jane Doe"},
            "skills": {"languages": ["Rust"]}
        })));

        assert_complete(&merged, RESUME_FIELDS, "$");
        assert_eq!(merged["personal_information"]["full_name"], "Jane Doe");
        assert_eq!(merged["personal_information"]["email"], Value::Null);
        assert_eq!(merged["skills"]["languages"], json!(["Rust"]));
        assert_eq!(merged["skills"]["tools"], json!([]));
        assert_eq!(merged["additional_information"]["awards"], json!([]));
    }

    #[test]
    fn test_lists_and_scalars_replaced_regardless_of_type() {
        let merged = merge_defaults(object(json!({
            "education": "BSc Computer Science",
            "professional_summary": 42,
            "skills": {"languages": "Rust, Go"}
        })));

        assert_eq!(merged["education"], json!("BSc Computer Science"));
        assert_eq!(merged["professional_summary"], json!(42));
        assert_eq!(merged["skills"]["languages"], json!("Rust, Go"));
    }

    #[test]
    fn test_wrong_typed_section_replaces_default() {
        let merged = merge_defaults(object(json!({"skills": ["Rust"]})));
        assert_eq!(merged["skills"], json!(["Rust"]));
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let merged = merge_defaults(object(json!({
            "hobbies": ["chess"],
            "personal_information": {"twitter": "@jane"}
        })));

        assert_eq!(merged["hobbies"], json!(["chess"]));
        assert_eq!(merged["personal_information"]["twitter"], "@jane");
        assert_complete(&merged, RESUME_FIELDS, "$");
    }

    #[test]
    fn test_skeleton_is_not_mutated_by_merge() {
        let _ = merge_defaults(object(json!({"personal_information": {"full_name": "X"}})));
        assert_eq!(
            default_skeleton()["personal_information"]["full_name"],
            Value::Null
        );
    }
}
