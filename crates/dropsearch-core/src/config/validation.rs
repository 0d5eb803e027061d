//! Config validation - warns about unknown fields, rejects malformed descriptors

use dropsearch_types::IndexDescriptor;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_config_keys();
    let unknowns = find_unknown_keys(&value, &expected, "");

    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Parse raw descriptors in order, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`crate::Error::Descriptor`] carrying the position and, when
/// present, the index name of the offending entry.
pub fn validate_descriptors(values: &[Value]) -> crate::Result<Vec<IndexDescriptor>> {
    values
        .iter()
        .enumerate()
        .map(|(position, value)| {
            IndexDescriptor::from_value(value)
                .map_err(|source| crate::Error::descriptor(position, descriptor_label(value), source))
        })
        .collect()
}

/// Name used in error messages: the index name if there is one.
fn descriptor_label(value: &Value) -> String {
    value
        .get("index")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("unnamed")
        .to_string()
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "appearance.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

/// Expected keys for Config (settings.rs). `indices` entries are left to the
/// host, which may add its own keys.
fn expected_config_keys() -> ExpectedKeys {
    // Union of the local and algolia variants
    let backend_keys = ExpectedKeys::new(&["kind", "dataset", "latencyMs", "appId", "apiKey"]);

    let input_style_keys = ExpectedKeys::new(&["fg", "bg", "border"]);
    let container_style_keys = ExpectedKeys::new(&["bg"]);

    let appearance_keys = ExpectedKeys::new(&[
        "placeholder",
        "cancelText",
        "cancelButtonColor",
        "resultsBackground",
        "footerHeight",
        "sideComponent",
        "titleFormat",
        "noResultsText",
    ])
    .with_nested("inputStyle", input_style_keys)
    .with_nested("containerStyle", container_style_keys);

    let animation_keys =
        ExpectedKeys::new(&["surfaceMs", "cancelStepMs", "cancelWidth", "easing", "commit"]);

    ExpectedKeys::new(&["indices"])
        .with_nested("backend", backend_keys)
        .with_nested("appearance", appearance_keys)
        .with_nested("animation", animation_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropsearch_types::DescriptorError;
    use serde_json::json;

    #[test]
    fn test_valid_config_no_warnings() {
        let json = r##"{
            "backend": {"kind": "algolia", "appId": "APP", "apiKey": "KEY"},
            "appearance": {
                "placeholder": "Search posts",
                "inputStyle": {"fg": "#000000"}
            },
            "animation": {"surfaceMs": 300},
            "indices": [{"index": "posts", "title": "Posts", "display": {"primary": "title"}}]
        }"##;

        let value: Value = serde_json::from_str(json).unwrap();
        let expected = expected_config_keys();
        let unknowns = find_unknown_keys(&value, &expected, "");

        assert!(
            unknowns.is_empty(),
            "Expected no unknowns, got: {unknowns:?}"
        );
    }

    #[test]
    fn test_unknown_top_level_field() {
        let json = r#"{
            "appearance": {},
            "unknownSection": {}
        }"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let expected = expected_config_keys();
        let unknowns = find_unknown_keys(&value, &expected, "");

        assert_eq!(unknowns, vec!["unknownSection"]);
    }

    #[test]
    fn test_unknown_nested_field() {
        let json = r#"{
            "animation": {
                "surfaceMs": 500,
                "durationMs": 100
            }
        }"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let expected = expected_config_keys();
        let unknowns = find_unknown_keys(&value, &expected, "");

        assert_eq!(unknowns, vec!["animation.durationMs"]);
    }

    #[test]
    fn test_unknown_deeply_nested_field() {
        let json = r##"{
            "appearance": {
                "inputStyle": {
                    "fg": "#000000",
                    "shadow": "#111111"
                }
            }
        }"##;

        let value: Value = serde_json::from_str(json).unwrap();
        let expected = expected_config_keys();
        let unknowns = find_unknown_keys(&value, &expected, "");

        assert_eq!(unknowns, vec!["appearance.inputStyle.shadow"]);
    }

    #[test]
    fn test_warn_unknown_fields_does_not_panic_on_invalid_json() {
        warn_unknown_fields("not valid json", "test");
    }

    #[test]
    fn test_validate_descriptors_in_order() {
        let values = vec![
            json!({"index": "posts", "title": "Posts"}),
            json!({"index": "users", "title": "Users", "params": {"hitsPerPage": 3}}),
        ];

        let descriptors = validate_descriptors(&values).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].index, "posts");
        assert_eq!(descriptors[1].index, "users");
        assert!(descriptors[1].params.is_some());
    }

    #[test]
    fn test_validate_descriptors_reports_position() {
        let values = vec![
            json!({"index": "posts", "title": "Posts"}),
            json!({"index": "users"}),
        ];

        let err = validate_descriptors(&values).unwrap_err();
        match err {
            crate::Error::Descriptor {
                position,
                label,
                source,
            } => {
                assert_eq!(position, 1);
                assert_eq!(label, "users");
                assert_eq!(source, DescriptorError::MissingTitle);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_descriptors_null_params() {
        let values = vec![json!({"index": "posts", "title": "Posts", "params": null})];

        let err = validate_descriptors(&values).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Descriptor {
                position: 0,
                source: DescriptorError::InvalidParams,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_descriptors_unnamed_label() {
        let err = validate_descriptors(&[json!("posts")]).unwrap_err();
        assert!(err.to_string().contains("(unnamed)"));
    }

    #[test]
    fn test_validate_descriptors_empty_list() {
        assert!(validate_descriptors(&[]).unwrap().is_empty());
    }
}
