//! Typed failures for catalog loading and batch scoring.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate indicator id '{0}'")]
    DuplicateIndicator(String),

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("indicator '{indicator}' refers to unknown category '{category}'")]
    UnknownCategory { indicator: String, category: String },

    #[error("weight {weight} for '{name}' must be a finite, non-negative number")]
    InvalidWeight { name: String, weight: f64 },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("cohort mixes years {expected} and {found}")]
    MixedYears { expected: i32, found: i32 },

    #[error("duplicate value for region '{region_id}', indicator '{indicator_id}', year {year}")]
    DuplicateValue {
        region_id: String,
        indicator_id: String,
        year: i32,
    },
}
