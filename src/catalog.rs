//! Indicator and category configuration.
//!
//! Stored as a JSON file on disk:
//! ```json
//! {
//!   "categories": [{ "name": "housing", "weight": 0.1667 }],
//!   "indicators": [
//!     { "id": "i-25", "name": "core_housing_need", "category": "housing", "unit": "%" }
//!   ]
//! }
//! ```

use crate::engine::CategoryWeight;
use crate::error::CatalogError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Catalog entry for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_inverse: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl IndicatorSpec {
    /// Percentages are bounded by 100; rates such as "per 100,000" are not.
    pub fn is_percentage(&self) -> bool {
        self.unit
            .as_deref()
            .is_some_and(|unit| unit == "%" || unit.contains("% of"))
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryWeight>,
    indicators: Vec<IndicatorSpec>,
}

/// Read-only indicator catalog with the ordered category weights.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<CategoryWeight>,
    indicators: Vec<IndicatorSpec>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Loads and checks the catalog at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog '{path}'"))?;
        let catalog = Self::from_json_str(&content)
            .with_context(|| format!("failed to load catalog '{path}'"))?;
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::new(file.categories, file.indicators)
    }

    /// Builds a catalog, rejecting duplicate ids, dangling categories and
    /// weights that are negative or not finite.
    pub fn new(
        categories: Vec<CategoryWeight>,
        indicators: Vec<IndicatorSpec>,
    ) -> Result<Self, CatalogError> {
        let mut category_names = HashSet::new();
        for category in &categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            if !is_valid_weight(category.weight) {
                return Err(CatalogError::InvalidWeight {
                    name: category.name.clone(),
                    weight: category.weight,
                });
            }
        }

        let mut by_id = HashMap::with_capacity(indicators.len());
        for (idx, indicator) in indicators.iter().enumerate() {
            if by_id.insert(indicator.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateIndicator(indicator.id.clone()));
            }
            if !category_names.contains(indicator.category.as_str()) {
                return Err(CatalogError::UnknownCategory {
                    indicator: indicator.id.clone(),
                    category: indicator.category.clone(),
                });
            }
            if !is_valid_weight(indicator.weight) {
                return Err(CatalogError::InvalidWeight {
                    name: indicator.id.clone(),
                    weight: indicator.weight,
                });
            }
        }

        Ok(Self {
            categories,
            indicators,
            by_id,
        })
    }

    pub fn indicator(&self, id: &str) -> Option<&IndicatorSpec> {
        self.by_id.get(id).map(|&idx| &self.indicators[idx])
    }

    /// Indicators in catalog order.
    pub fn indicators(&self) -> &[IndicatorSpec] {
        &self.indicators
    }

    /// Category weights in catalog order.
    pub fn category_weights(&self) -> &[CategoryWeight] {
        &self.categories
    }

    /// Names of indicators measured as percentages.
    pub fn percentage_indicators(&self) -> HashSet<String> {
        self.indicators
            .iter()
            .filter(|i| i.is_percentage())
            .map(|i| i.name.clone())
            .collect()
    }
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "categories": [
            { "name": "socioeconomic", "weight": 0.5 },
            { "name": "environmental", "weight": 0.5 }
        ],
        "indicators": [
            { "id": "i1", "name": "unemployment_rate", "category": "socioeconomic", "unit": "%" },
            { "id": "i2", "name": "median_household_income", "category": "socioeconomic",
              "unit": "% of provincial median", "is_inverse": true },
            { "id": "i3", "name": "violent_crime_rate", "category": "environmental",
              "unit": "per 100,000", "weight": 2.0 }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.indicators().len(), 3);
        assert_eq!(catalog.category_weights()[1].name, "environmental");

        let income = catalog.indicator("i2").unwrap();
        assert!(income.is_inverse);
        assert_eq!(income.weight, 1.0);
        assert_eq!(catalog.indicator("i3").unwrap().weight, 2.0);
        assert!(catalog.indicator("nope").is_none());
    }

    #[test]
    fn test_percentage_indicators() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let pct = catalog.percentage_indicators();
        assert!(pct.contains("unemployment_rate"));
        assert!(pct.contains("median_household_income"));
        assert!(!pct.contains("violent_crime_rate"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = r#"{ "categories": [],
            "indicators": [{ "id": "i1", "name": "x", "category": "housing" }] }"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { .. }));
    }

    #[test]
    fn test_duplicates_rejected() {
        let categories = vec![CategoryWeight::new("health", 1.0)];
        let spec = IndicatorSpec {
            id: "i1".into(),
            name: "x".into(),
            category: "health".into(),
            unit: None,
            weight: 1.0,
            is_inverse: false,
        };
        let err = Catalog::new(categories.clone(), vec![spec.clone(), spec]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIndicator(id) if id == "i1"));

        let err = Catalog::new(vec![categories[0].clone(), categories[0].clone()], vec![])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = Catalog::new(vec![CategoryWeight::new("health", -0.1)], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidWeight { .. }));
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        for weight in [f64::NAN, f64::INFINITY] {
            let err = Catalog::new(vec![CategoryWeight::new("health", weight)], vec![]).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidWeight { ref name, .. } if name == "health"));

            let spec = IndicatorSpec {
                id: "i1".into(),
                name: "x".into(),
                category: "health".into(),
                unit: None,
                weight,
                is_inverse: false,
            };
            let err =
                Catalog::new(vec![CategoryWeight::new("health", 1.0)], vec![spec]).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidWeight { ref name, .. } if name == "i1"));
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json_str("{").unwrap_err(),
            CatalogError::Json(_)
        ));
    }
}
