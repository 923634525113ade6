//! Social vulnerability scoring engine.
//!
//! Normalizes indicator cohorts onto a 0–100 scale, blends them into
//! category and composite scores, assigns letter grades, and validates raw
//! inputs. Every function here is pure.

pub mod aggregate;
pub mod grade;
pub mod normalize;
pub mod region;
pub mod risk;
pub mod types;
pub mod validate;

pub use aggregate::{category_score, composite_score};
pub use grade::grade;
pub use normalize::normalize;
pub use region::score_region;
pub use risk::risk_index;
pub use types::{
    CategoryWeight, Grade, IndicatorDatum, NormalizationMethod, RegionScore, ValidationError,
    ValidationResult, ValidationWarning,
};
pub use validate::validate;
