//! Risk index: a fixed blend of the vulnerability index with three macro
//! scores produced outside the engine.

const VULNERABILITY_WEIGHT: f64 = 0.4;
const RESOURCES_WEIGHT: f64 = 0.2;
const PRESSURE_WEIGHT: f64 = 0.2;
const FUNDING_WEIGHT: f64 = 0.2;

/// Blends four scores already on a comparable 0–100 scale.
///
/// No clamping or validation is applied.
pub fn risk_index(
    vulnerability_index: f64,
    resources_score: f64,
    pressure_score: f64,
    funding_score: f64,
) -> f64 {
    VULNERABILITY_WEIGHT * vulnerability_index
        + RESOURCES_WEIGHT * resources_score
        + PRESSURE_WEIGHT * pressure_score
        + FUNDING_WEIGHT * funding_score
}
