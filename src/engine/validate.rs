//! Sanity checks on raw indicator values before they are normalized.

use crate::engine::types::{IndicatorDatum, ValidationError, ValidationResult, ValidationWarning};
use std::collections::HashSet;

/// Checks raw indicator magnitudes.
///
/// A NaN or infinite value is an error, as is a negative one. A value above
/// 100 is a warning; when
/// `percentage_indicators` is given, only indicators named in it are checked
/// for this, since per-capita rates can legitimately exceed 100.
pub fn validate(
    indicators: &[IndicatorDatum],
    percentage_indicators: Option<&HashSet<String>>,
) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for indicator in indicators {
        if !indicator.value.is_finite() {
            errors.push(ValidationError {
                indicator_id: indicator.indicator_id.clone(),
                message: format!("Non-finite value for indicator {}", indicator.indicator_name),
            });
            continue;
        }

        if indicator.value < 0.0 {
            errors.push(ValidationError {
                indicator_id: indicator.indicator_id.clone(),
                message: format!("Negative value for indicator {}", indicator.indicator_name),
            });
        }

        let bounded = percentage_indicators
            .map_or(true, |names| names.contains(&indicator.indicator_name));

        if bounded && indicator.value > 100.0 {
            warnings.push(ValidationWarning {
                indicator_id: indicator.indicator_id.clone(),
                message: format!("Value exceeds 100 for indicator {}", indicator.indicator_name),
            });
        }
    }

    ValidationResult::new(warnings, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(id: &str, name: &str, value: f64) -> IndicatorDatum {
        IndicatorDatum::new(id, name, "socioeconomic", value, 1.0, false)
    }

    #[test]
    fn test_valid_values() {
        let indicators = vec![
            datum("i1", "unemployment_rate", 7.5),
            datum("i2", "low_income_rate", 12.0),
        ];
        let result = validate(&indicators, None);
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_negative_value_is_error() {
        let result = validate(&[datum("i1", "unemployment_rate", -5.0)], None);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message,
            "Negative value for indicator unemployment_rate"
        );
        assert_eq!(result.errors()[0].indicator_id, "i1");
    }

    #[test]
    fn test_over_100_is_warning() {
        let result = validate(&[datum("i1", "unemployment_rate", 105.0)], None);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.warnings()[0].message.contains("exceeds 100"));
    }

    #[test]
    fn test_rates_outside_percentage_set_are_not_checked() {
        let pct: HashSet<String> = ["unemployment_rate", "low_income_rate"]
            .into_iter()
            .map(String::from)
            .collect();
        let result = validate(&[datum("i1", "violent_crime_rate", 250.0)], Some(&pct));
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());

        let result = validate(&[datum("i2", "low_income_rate", 101.0)], Some(&pct));
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_negative_checked_regardless_of_percentage_set() {
        let pct = HashSet::new();
        let result = validate(&[datum("i1", "violent_crime_rate", -1.0)], Some(&pct));
        assert!(!result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_non_finite_values_are_errors() {
        let pct = HashSet::new();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = validate(&[datum("i1", "unemployment_rate", value)], Some(&pct));
            assert!(!result.is_valid(), "value {value}");
            assert_eq!(result.errors().len(), 1);
            assert_eq!(
                result.errors()[0].message,
                "Non-finite value for indicator unemployment_rate"
            );
        }

        // reported once, not also as over 100 or negative
        let result = validate(&[datum("i1", "unemployment_rate", f64::INFINITY)], None);
        assert_eq!(result.errors().len(), 1);
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_mixed_findings_accumulate() {
        let indicators = vec![
            datum("i1", "unemployment_rate", 7.5),
            datum("i2", "low_income_rate", -3.0),
            datum("i3", "no_high_school_diploma", 150.0),
        ];
        let result = validate(&indicators, None);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].indicator_id, "i3");
    }
}
