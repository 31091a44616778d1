// ABOUTME: Flattens an untyped specification map into key/value rows
// ABOUTME: Filterability is derived from a fixed allow-list of key names

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validator::SpecError;

/// Spec keys eligible for search filters and facets
pub const FILTERABLE_SPEC_KEYS: &[&str] = &[
    "socket",
    "form_factor",
    "memory_type",
    "storage_type",
    "interface",
    "generation",
    "process_size",
    "tdp_range",
    "wattage",
    "efficiency",
    "certification",
];

/// Stored type tag; every flattened value is text today
pub const SPEC_TYPE_STRING: &str = "string";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub key: String,
    pub value: String,
    pub spec_type: String,
    pub is_filterable: bool,
}

pub fn is_filterable_spec(key: &str) -> bool {
    FILTERABLE_SPEC_KEYS.contains(&key)
}

/// One entry per top-level key, in map order. `null` values are skipped.
pub fn flatten_specs(specs: &Map<String, Value>) -> Result<Vec<SpecEntry>, SpecError> {
    let mut entries = Vec::with_capacity(specs.len());
    let mut seen = HashSet::with_capacity(specs.len());

    for (key, value) in specs {
        let key = key.trim();
        if key.is_empty() {
            return Err(SpecError::InvalidKey("spec keys must not be empty".to_string()));
        }
        if !seen.insert(key) {
            return Err(SpecError::InvalidKey(format!("duplicate spec key '{}'", key)));
        }

        let value = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        entries.push(SpecEntry {
            key: key.to_string(),
            value,
            spec_type: SPEC_TYPE_STRING.to_string(),
            is_filterable: is_filterable_spec(key),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn flatten(value: Value) -> Result<Vec<SpecEntry>, SpecError> {
        match value {
            Value::Object(m) => flatten_specs(&m),
            other => panic!("expected object, got {other}"),
        }
    }

    fn find<'a>(entries: &'a [SpecEntry], key: &str) -> &'a SpecEntry {
        entries.iter().find(|e| e.key == key).unwrap()
    }

    #[test]
    fn test_socket_is_filterable_and_cores_is_not() {
        let entries = flatten(json!({"socket": "AM5", "cores": 8})).unwrap();

        assert_eq!(entries.len(), 2);
        let socket = find(&entries, "socket");
        assert_eq!(socket.value, "AM5");
        assert!(socket.is_filterable);
        let cores = find(&entries, "cores");
        assert_eq!(cores.value, "8");
        assert!(!cores.is_filterable);
        assert!(entries.iter().all(|e| e.spec_type == SPEC_TYPE_STRING));
    }

    #[test]
    fn test_value_stringification() {
        let entries = flatten(json!({
            "modular": true,
            "outputs": ["HDMI", "DP"],
            "usb": {"usb3": 4},
            "clock": 4.5,
            "missing": null
        }))
        .unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(find(&entries, "modular").value, "true");
        assert_eq!(find(&entries, "outputs").value, r#"["HDMI","DP"]"#);
        assert_eq!(find(&entries, "usb").value, r#"{"usb3":4}"#);
        assert_eq!(find(&entries, "clock").value, "4.5");
        assert!(entries.iter().all(|e| e.key != "missing"));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(matches!(flatten(json!({" ": "x"})), Err(SpecError::InvalidKey(_))));
    }

    #[test]
    fn test_keys_colliding_after_trim_are_rejected() {
        let err = flatten(json!({"socket": "AM5", " socket": "AM4"})).unwrap_err();
        assert_eq!(err, SpecError::InvalidKey("duplicate spec key 'socket'".to_string()));
    }

    #[test]
    fn test_allow_list() {
        assert!(is_filterable_spec("memory_type"));
        assert!(is_filterable_spec("wattage"));
        assert!(!is_filterable_spec("Socket"));
        assert!(!is_filterable_spec("threads"));
    }
}
