//! Field extraction from raw `nvme smart-log` text.

use tracing::debug;

use crate::normalize::TemperatureUnit;
use crate::rules::RuleCatalog;

/// A value matched by one rule, before unit normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedField {
    pub name: &'static str,
    pub value: i128,
    /// Set only for temperature-family rules.
    pub temperature: bool,
    pub unit: Option<TemperatureUnit>,
}

/// Applies every rule of `catalog` to `text`.
///
/// Unmatched rules produce no field. The result keeps catalog order.
pub fn extract_fields(text: &str, catalog: &RuleCatalog) -> Vec<ExtractedField> {
    let mut fields = Vec::with_capacity(catalog.len());

    for compiled in catalog.rules() {
        let Some(caps) = compiled.regex.captures(text) else {
            continue;
        };
        let Some(raw) = caps.get(1) else {
            continue;
        };

        let value = match parse_grouped_integer(raw.as_str()) {
            Some(v) => v,
            None => {
                debug!(
                    "Ignoring unparsable value {:?} for {}",
                    raw.as_str(),
                    compiled.rule.name
                );
                continue;
            }
        };

        let unit = if compiled.rule.temperature {
            caps.get(2)
                .and_then(|m| TemperatureUnit::from_symbol(m.as_str()))
        } else {
            None
        };

        fields.push(ExtractedField {
            name: compiled.rule.name,
            value,
            temperature: compiled.rule.temperature,
            unit,
        });
    }

    fields
}

/// Parses digits with optional `,` thousands separators.
fn parse_grouped_integer(raw: &str) -> Option<i128> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RuleCatalog {
        RuleCatalog::smart_log().unwrap()
    }

    fn find(fields: &[ExtractedField], name: &str) -> Option<ExtractedField> {
        fields.iter().copied().find(|f| f.name == name)
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let fields = extract_fields("data units written : 12,345", &catalog());
        assert_eq!(find(&fields, "data_units_written").unwrap().value, 12345);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let fields = extract_fields("POWER ON HOURS : 1021\nMedia Errors : 0", &catalog());
        assert_eq!(find(&fields, "power_on_hours").unwrap().value, 1021);
        assert_eq!(find(&fields, "media_errors").unwrap().value, 0);
    }

    #[test]
    fn test_unmatched_rules_are_absent() {
        let fields = extract_fields("power_cycles : 12", &catalog());
        assert_eq!(fields.len(), 1);
        assert!(find(&fields, "temperature").is_none());
    }

    #[test]
    fn test_temperature_unit_captured() {
        let fields = extract_fields("temperature : 95 °F", &catalog());
        let field = find(&fields, "temperature").unwrap();
        assert_eq!(field.value, 95);
        assert!(field.temperature);
        assert_eq!(field.unit, Some(TemperatureUnit::Fahrenheit));
    }

    #[test]
    fn test_separator_only_value_is_a_miss() {
        let fields = extract_fields("host read commands : ,,,", &catalog());
        assert!(find(&fields, "host_read_commands").is_none());
    }

    #[test]
    fn test_non_temperature_fields_have_no_unit() {
        let fields = extract_fields("power cycles : 12 C", &catalog());
        let field = find(&fields, "power_cycles").unwrap();
        assert!(!field.temperature);
        assert_eq!(field.unit, None);
    }

    #[test]
    fn test_counters_wider_than_64_bits() {
        let text = "data units written : 18,446,744,073,709,551,616\n\
                    host read commands : 9223372036854775808";
        let fields = extract_fields(text, &catalog());
        assert_eq!(
            find(&fields, "data_units_written").unwrap().value,
            18_446_744_073_709_551_616
        );
        assert_eq!(
            find(&fields, "host_read_commands").unwrap().value,
            9_223_372_036_854_775_808
        );
    }
}
