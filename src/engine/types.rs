//! Data types shared by the scoring engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One indicator's contribution for one region.
///
/// `weight` is the relative importance inside the indicator's category and
/// does not have to sum to 1 across the category. `is_inverse` marks
/// indicators where a higher raw value means lower vulnerability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDatum {
    pub indicator_id: String,
    pub indicator_name: String,
    pub category: String,
    pub value: f64,
    pub weight: f64,
    pub is_inverse: bool,
}

impl IndicatorDatum {
    pub fn new(
        indicator_id: &str,
        indicator_name: &str,
        category: &str,
        value: f64,
        weight: f64,
        is_inverse: bool,
    ) -> Self {
        Self {
            indicator_id: indicator_id.to_string(),
            indicator_name: indicator_name.to_string(),
            category: category.to_string(),
            value,
            weight,
            is_inverse,
        }
    }
}

/// Weight of a category in the composite blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub name: String,
    pub weight: f64,
}

impl CategoryWeight {
    pub fn new(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
        }
    }
}

/// Cross-sectional scaling rule applied to one indicator cohort.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NormalizationMethod {
    #[default]
    MinMax,
    ZScore,
    Percentile,
}

impl NormalizationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "min_max",
            NormalizationMethod::ZScore => "z_score",
            NormalizationMethod::Percentile => "percentile",
        }
    }
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade, `A` least vulnerable through `E` most vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn as_char(&self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::E => 'E',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Non-fatal finding about a raw indicator value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub indicator_id: String,
    pub message: String,
}

/// Fatal finding about a raw indicator value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub indicator_id: String,
    pub message: String,
}

/// Outcome of [`validate`](crate::engine::validate::validate).
///
/// Only errors affect validity; warnings are informational.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    warnings: Vec<ValidationWarning>,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(warnings: Vec<ValidationWarning>, errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            warnings,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

/// Scoring result for one region in one pass. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionScore {
    pub region_id: String,
    pub composite_score: f64,
    pub grade: Grade,
    pub category_scores: IndexMap<String, f64>,
}
