//! Temperature unit normalization.
//!
//! nvme-cli prints temperatures in Celsius by default but can be asked for
//! Fahrenheit or Kelvin. Exported temperatures are always whole degrees
//! Celsius, truncated toward zero.

use crate::extract::ExtractedField;

/// Unit symbol captured after a temperature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Maps `C`, `F` or `K` (any case) to a unit.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "C" | "c" => Some(TemperatureUnit::Celsius),
            "F" | "f" => Some(TemperatureUnit::Fahrenheit),
            "K" | "k" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    /// Converts `value` in this unit to truncated Celsius.
    pub fn to_celsius(self, value: i128) -> i128 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => ((value as f64 - 32.0) * 5.0 / 9.0) as i128,
            TemperatureUnit::Kelvin => (value as f64 - 273.15) as i128,
        }
    }
}

/// Rewrites every temperature-family field to Celsius in place.
///
/// Fields outside the temperature family are left untouched.
pub fn normalize_temperatures(fields: &mut [ExtractedField]) {
    for field in fields.iter_mut().filter(|f| f.temperature) {
        if let Some(unit) = field.unit {
            field.value = unit.to_celsius(field.value);
            field.unit = Some(TemperatureUnit::Celsius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature(name: &'static str, value: i128, unit: Option<TemperatureUnit>) -> ExtractedField {
        ExtractedField {
            name,
            value,
            temperature: true,
            unit,
        }
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(95), 35);
        // 100F = 37.77C
        assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(100), 37);
        // Truncation goes toward zero below freezing.
        assert_eq!(TemperatureUnit::Fahrenheit.to_celsius(20), -6);
    }

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(TemperatureUnit::Kelvin.to_celsius(308), 34);
        assert_eq!(TemperatureUnit::Kelvin.to_celsius(273), 0);
    }

    #[test]
    fn test_symbol_parsing() {
        assert_eq!(TemperatureUnit::from_symbol("f"), Some(TemperatureUnit::Fahrenheit));
        assert_eq!(TemperatureUnit::from_symbol("K"), Some(TemperatureUnit::Kelvin));
        assert_eq!(TemperatureUnit::from_symbol("X"), None);
    }

    #[test]
    fn test_normalize_applies_per_sensor() {
        let mut fields = vec![
            temperature("temperature", 95, Some(TemperatureUnit::Fahrenheit)),
            temperature("temperature_sensor_1", 308, Some(TemperatureUnit::Kelvin)),
            temperature("temperature_sensor_2", 41, None),
            ExtractedField {
                name: "power_cycles",
                value: 308,
                temperature: false,
                unit: Some(TemperatureUnit::Kelvin),
            },
        ];

        normalize_temperatures(&mut fields);

        let values: Vec<i128> = fields.iter().map(|f| f.value).collect();
        assert_eq!(values, [35, 34, 41, 308]);
    }
}
