// ABOUTME: Decodes an untyped specification map into its category schema
// ABOUTME: A successful decode only gates persistence; the caller keeps the original map

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::category::ComponentCategory;
use crate::schema::CategorySpecs;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid {category} specs: {reason}")]
    Invalid { category: String, reason: String },

    #[error("invalid spec key: {0}")]
    InvalidKey(String),
}

/// Validate `specs` against the schema of `category` (case-insensitive, trimmed).
pub fn validate_specs(category: &str, specs: &Map<String, Value>) -> Result<CategorySpecs, SpecError> {
    let category: ComponentCategory = category
        .parse()
        .map_err(|_| SpecError::UnknownCategory(category.trim().to_string()))?;

    let decoded = match category {
        ComponentCategory::Cpu => CategorySpecs::Cpu(decode(category, specs)?),
        ComponentCategory::Gpu => CategorySpecs::Gpu(decode(category, specs)?),
        ComponentCategory::Mainboard => CategorySpecs::Mainboard(decode(category, specs)?),
        ComponentCategory::Ram => CategorySpecs::Ram(decode(category, specs)?),
        ComponentCategory::Storage => CategorySpecs::Storage(decode(category, specs)?),
        ComponentCategory::Psu => CategorySpecs::Psu(decode(category, specs)?),
    };

    debug!(category = %category, keys = specs.len(), "Specs validated");
    Ok(decoded)
}

fn decode<T: DeserializeOwned>(category: ComponentCategory, specs: &Map<String, Value>) -> Result<T, SpecError> {
    serde_json::from_value(Value::Object(specs.clone())).map_err(|e| SpecError::Invalid {
        category: category.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[rstest]
    #[case("CPU", ComponentCategory::Cpu)]
    #[case(" gpu ", ComponentCategory::Gpu)]
    #[case("mainboard", ComponentCategory::Mainboard)]
    #[case("Ram", ComponentCategory::Ram)]
    #[case("storage", ComponentCategory::Storage)]
    #[case("psu", ComponentCategory::Psu)]
    fn test_empty_specs_are_valid_for_every_category(#[case] tag: &str, #[case] expected: ComponentCategory) {
        let decoded = validate_specs(tag, &Map::new()).unwrap();
        assert_eq!(decoded.category(), expected);
    }

    #[test]
    fn test_unknown_category() {
        let err = validate_specs("cooler", &Map::new()).unwrap_err();
        assert_eq!(err, SpecError::UnknownCategory("cooler".to_string()));
    }

    #[test]
    fn test_flat_keys_outside_the_schema_are_accepted() {
        let specs = map(json!({"socket": "AM5", "cores": 8}));
        assert!(validate_specs("CPU", &specs).is_ok());
    }

    #[test]
    fn test_nested_cpu_specs_decode() {
        let specs = map(json!({
            "physical": {"socket": "AM5", "process_size": 5},
            "performance": {"cores": 8, "threads": 16, "tdp": "105W"}
        }));

        let CategorySpecs::Cpu(cpu) = validate_specs("cpu", &specs).unwrap() else {
            panic!("expected CPU specs");
        };
        assert_eq!(cpu.physical.socket, "AM5");
        assert_eq!(cpu.physical.process_size, "5");
        assert_eq!(cpu.performance.cores, Some(8));
        assert_eq!(cpu.performance.threads, Some(16));
        assert_eq!(cpu.performance.tdp, "105W");
    }

    #[test]
    fn test_integer_fields_are_strict() {
        let specs = map(json!({"performance": {"cores": "eight"}}));
        let err = validate_specs("CPU", &specs).unwrap_err();
        assert!(matches!(err, SpecError::Invalid { ref category, .. } if category == "CPU"));
    }

    #[test]
    fn test_string_fields_tolerate_other_scalars() {
        let specs = map(json!({
            "power": {"wattage": 850, "modular": "yes", "certification": true},
            "physical": "not-an-object"
        }));

        let CategorySpecs::Psu(psu) = validate_specs("PSU", &specs).unwrap() else {
            panic!("expected PSU specs");
        };
        assert_eq!(psu.power.wattage, "850");
        assert!(psu.power.modular);
        assert_eq!(psu.power.certification, "true");
        assert_eq!(psu.physical.form_factor, "");
    }

    #[test]
    fn test_mainboard_nested_records() {
        let specs = map(json!({
            "memory": {"type": "DDR5", "slots": 4},
            "expansion": {"pcie_slots": [{"version": "5.0", "lanes": "x16", "count": 1}, "junk"]},
            "storage": {"m2_slots": [{"key_type": "M", "generation": 4}]},
            "connectivity": {"usb": {"usb3": 6}, "ethernet": "2.5GbE"}
        }));

        let CategorySpecs::Mainboard(board) = validate_specs("MAINBOARD", &specs).unwrap() else {
            panic!("expected mainboard specs");
        };
        assert_eq!(board.memory.memory_type, "DDR5");
        assert_eq!(board.memory.slots, Some(4));
        assert_eq!(board.expansion.pcie_slots.len(), 1);
        assert_eq!(board.expansion.pcie_slots[0].count, Some(1));
        assert_eq!(board.storage.m2_slots[0].generation, "4");
        assert_eq!(board.connectivity.usb.usb3, Some(6));
        assert_eq!(board.connectivity.ethernet, vec!["2.5GbE".to_string()]);
    }

    #[test]
    fn test_strict_integer_inside_nested_record() {
        let specs = map(json!({"expansion": {"pcie_slots": [{"count": "two"}]}}));
        assert!(matches!(
            validate_specs("mainboard", &specs),
            Err(SpecError::Invalid { .. })
        ));
    }
}
