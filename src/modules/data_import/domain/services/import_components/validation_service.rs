use crate::modules::data_import::domain::entity_spec::{EntitySpec, FieldKind, FieldSpec, Presence};
use crate::modules::data_import::domain::row::{FieldValue, ImportRow, NormalizedRow};

use super::types::RowError;

/// Validates and normalizes rows against an entity spec. Pure; no I/O.
#[derive(Clone, Copy, Default)]
pub struct ValidationService;

impl ValidationService {
    /// Required fields are checked first, in declaration order, and the first
    /// missing one fails the row. Remaining fields are then coerced and
    /// defaults substituted for absent or blank values.
    pub fn validate(row: &ImportRow, spec: &EntitySpec) -> Result<NormalizedRow, RowError> {
        let mut normalized = NormalizedRow::default();

        for field in spec.required_fields() {
            match Self::normalize_value(row.get(&field.key), field)? {
                Some(value) => normalized.set(&field.key, value),
                None => {
                    return Err(RowError::Validation(format!("{} is required", field.label)));
                }
            }
        }

        for field in spec.fields().iter().filter(|f| !f.is_required()) {
            let value = Self::normalize_value(row.get(&field.key), field)?;
            match (value, &field.presence) {
                (Some(value), _) => normalized.set(&field.key, value),
                (None, Presence::Defaulted(default)) => normalized.set(&field.key, default.clone()),
                (None, _) => {}
            }
        }

        Ok(normalized)
    }

    /// `Ok(None)` means absent: missing, `null`, or blank after trimming.
    /// An explicit numeric 0 is a value, not an absence.
    fn normalize_value(
        raw: Option<&FieldValue>,
        field: &FieldSpec,
    ) -> Result<Option<FieldValue>, RowError> {
        let raw = match raw {
            Some(value) if !value.is_blank() => value,
            _ => return Ok(None),
        };

        match (field.kind, raw) {
            (FieldKind::Text, FieldValue::Text(s)) => Ok(Some(FieldValue::text(s.trim()))),
            (FieldKind::Text, FieldValue::Number(n)) => Ok(Some(FieldValue::text(n.to_string()))),
            (FieldKind::Integer, FieldValue::Number(n)) => Self::whole_number(n)
                .map(|i| Some(FieldValue::integer(i)))
                .ok_or_else(|| Self::not_whole(field)),
            (FieldKind::Integer, FieldValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(|i| Some(FieldValue::integer(i)))
                .map_err(|_| Self::not_whole(field)),
        }
    }

    /// 2^63; `i64::MAX as f64` rounds up to this value, which does not fit
    const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

    fn whole_number(n: &serde_json::Number) -> Option<i64> {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
        // Spreadsheet exports often serialize integers as 3.0
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < Self::I64_UPPER_BOUND)
            .map(|f| f as i64)
    }

    fn not_whole(field: &FieldSpec) -> RowError {
        RowError::Validation(format!("{} must be a whole number", field.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_row() -> ImportRow {
        ImportRow::new()
            .with("property_id", "p1")
            .with("code", "U1")
            .with("name", "Unit 1")
    }

    #[test]
    fn test_missing_name_on_property() {
        let row = ImportRow::new().with("name", "");
        let err = ValidationService::validate(&row, &EntitySpec::properties()).unwrap_err();
        assert_eq!(err, RowError::Validation("Name is required".to_string()));
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let row = ImportRow::new().with("name", "   ");
        let err = ValidationService::validate(&row, &EntitySpec::properties()).unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_first_missing_required_field_wins() {
        let row = ImportRow::new().with("code", "U1");
        let err = ValidationService::validate(&row, &EntitySpec::units()).unwrap_err();
        assert_eq!(err.to_string(), "Property ID is required");

        let row = ImportRow::new().with("property_id", "p1");
        let err = ValidationService::validate(&row, &EntitySpec::units()).unwrap_err();
        assert_eq!(err.to_string(), "Code is required");
    }

    #[test]
    fn test_values_are_trimmed() {
        let row = ImportRow::new().with("name", "  Edificio A ").with("city", " Lima ");
        let normalized = ValidationService::validate(&row, &EntitySpec::properties()).unwrap();
        assert_eq!(normalized.get("name"), Some(&FieldValue::text("Edificio A")));
        assert_eq!(normalized.get("city"), Some(&FieldValue::text("Lima")));
    }

    #[test]
    fn test_blank_optional_field_is_dropped() {
        let row = ImportRow::new().with("name", "Edificio A").with("code", "  ");
        let normalized = ValidationService::validate(&row, &EntitySpec::properties()).unwrap();
        assert_eq!(normalized.get("code"), None);
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn test_defaults_substituted_for_units() {
        let normalized = ValidationService::validate(&unit_row(), &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("max_guests"), Some(&FieldValue::integer(2)));
        assert_eq!(normalized.get("bedrooms"), Some(&FieldValue::integer(1)));
        assert_eq!(normalized.get("bathrooms"), Some(&FieldValue::integer(1)));
    }

    #[test]
    fn test_explicit_zero_is_preserved() {
        let row = unit_row().with("bedrooms", 0).with("bathrooms", "0");
        let normalized = ValidationService::validate(&row, &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("bedrooms"), Some(&FieldValue::integer(0)));
        assert_eq!(normalized.get("bathrooms"), Some(&FieldValue::integer(0)));
        assert_eq!(normalized.get("max_guests"), Some(&FieldValue::integer(2)));
    }

    #[test]
    fn test_blank_string_falls_back_to_default() {
        let row = unit_row().with("max_guests", " ");
        let normalized = ValidationService::validate(&row, &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("max_guests"), Some(&FieldValue::integer(2)));
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let row = unit_row().with("max_guests", " 6 ");
        let normalized = ValidationService::validate(&row, &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("max_guests"), Some(&FieldValue::integer(6)));
    }

    #[test]
    fn test_non_integer_is_rejected() {
        let row = unit_row().with("bedrooms", "two");
        let err = ValidationService::validate(&row, &EntitySpec::units()).unwrap_err();
        assert_eq!(err.to_string(), "Bedrooms must be a whole number");

        let row: ImportRow = serde_json::from_value(serde_json::json!({
            "property_id": "p1", "code": "U1", "name": "Unit 1", "bathrooms": 1.5
        }))
        .unwrap();
        let err = ValidationService::validate(&row, &EntitySpec::units()).unwrap_err();
        assert_eq!(err.to_string(), "Bathrooms must be a whole number");
    }

    #[test]
    fn test_float_with_zero_fraction_accepted() {
        let row: ImportRow = serde_json::from_value(serde_json::json!({
            "property_id": "p1", "code": "U1", "name": "Unit 1", "max_guests": 4.0
        }))
        .unwrap();
        let normalized = ValidationService::validate(&row, &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("max_guests"), Some(&FieldValue::integer(4)));
    }

    #[test]
    fn test_numeric_code_becomes_text() {
        let row = ImportRow::new()
            .with("property_id", "p1")
            .with("code", 101)
            .with("name", "Unit 101");
        let normalized = ValidationService::validate(&row, &EntitySpec::units()).unwrap();
        assert_eq!(normalized.get("code"), Some(&FieldValue::text("101")));
    }

    #[test]
    fn test_undeclared_fields_are_dropped() {
        let row = ImportRow::new().with("name", "Edificio A").with("color", "blue");
        let normalized = ValidationService::validate(&row, &EntitySpec::properties()).unwrap();
        assert_eq!(normalized.get("color"), None);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let row = unit_row().with("bedrooms", "3");
        let first = ValidationService::validate(&row, &EntitySpec::units());
        let second = ValidationService::validate(&row, &EntitySpec::units());
        assert_eq!(first, second);
    }

    #[test]
    fn test_float_beyond_i64_range_is_rejected() {
        let row: ImportRow = serde_json::from_str(
            r#"{"property_id": "p1", "code": "U1", "name": "Unit 1", "max_guests": 9223372036854775808.0}"#,
        )
        .unwrap();
        let err = ValidationService::validate(&row, &EntitySpec::units()).unwrap_err();
        assert_eq!(err.to_string(), "Max guests must be a whole number");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use proptest::test_runner::Config;

        const UNIT_KEYS: [&str; 6] = [
            "property_id",
            "code",
            "name",
            "max_guests",
            "bedrooms",
            "bathrooms",
        ];

        fn field_value() -> impl Strategy<Value = FieldValue> {
            prop_oneof![
                any::<i32>().prop_map(FieldValue::from),
                (-5_i64..50).prop_map(|n| FieldValue::text(format!(" {} ", n))),
                "[ a-z0-9\\.]{0,6}".prop_map(FieldValue::text),
            ]
        }

        fn unit_row() -> impl Strategy<Value = ImportRow> {
            proptest::collection::vec(proptest::option::of(field_value()), UNIT_KEYS.len())
                .prop_map(|values| {
                    let mut row = ImportRow::new();
                    for (key, value) in UNIT_KEYS.iter().zip(values) {
                        if let Some(value) = value {
                            row.insert(key, value);
                        }
                    }
                    row
                })
        }

        proptest! {
            #![proptest_config(Config::with_cases(256))]
            #[test]
            fn validation_is_deterministic_and_complete(row in unit_row()) {
                let spec = EntitySpec::units();
                let first = ValidationService::validate(&row, &spec);
                let second = ValidationService::validate(&row, &spec);
                prop_assert_eq!(&first, &second);

                if let Ok(normalized) = first {
                    for field in spec.fields() {
                        prop_assert!(normalized.get(&field.key).is_some(), "{} missing", field.key);
                    }
                }
            }

            #[test]
            fn missing_required_field_always_fails(row in unit_row()) {
                let spec = EntitySpec::units();
                let missing = spec
                    .required_fields()
                    .find(|f| row.get(&f.key).map_or(true, FieldValue::is_blank));

                if let Some(field) = missing {
                    let err = ValidationService::validate(&row, &spec).unwrap_err();
                    prop_assert_eq!(err.to_string(), format!("{} is required", field.label));
                }
            }
        }
    }
}
