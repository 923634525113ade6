//! Weighted aggregation of normalized indicator values into category and
//! composite scores.
//!
//! Sums run over ordered slices so results are reproducible bit for bit.
//! Both scores are clamped to `[0, 100]` and rounded to two decimals, which
//! absorbs the last-bit drift of a weighted mean (a mean of all-100 values
//! can otherwise land on `100.00000000000001`).

use crate::engine::types::{CategoryWeight, IndicatorDatum};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Weighted mean of the normalized values of one category's indicators.
///
/// An indicator missing from `normalized` contributes `0.0` but keeps its
/// weight in the denominator, so missing data pulls the score down. Returns
/// `0.0` when the weights sum to zero.
pub fn category_score(indicators: &[IndicatorDatum], normalized: &HashMap<String, f64>) -> f64 {
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for indicator in indicators {
        let value = normalized
            .get(&indicator.indicator_id)
            .copied()
            .unwrap_or(0.0);

        weighted_total += value * indicator.weight;
        weight_sum += indicator.weight;
    }

    if weight_sum == 0.0 {
        0.0
    } else {
        round_score(weighted_total / weight_sum)
    }
}

/// Weighted blend of category scores into the composite score.
///
/// Only weights whose category is present in `category_scores` count
/// towards the denominator; scored categories without a weight are ignored.
/// Returns `0.0` when the participating weights sum to zero.
pub fn composite_score(category_scores: &IndexMap<String, f64>, weights: &[CategoryWeight]) -> f64 {
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;

    for w in weights {
        let Some(score) = category_scores.get(&w.name) else {
            continue;
        };

        weighted_total += score * w.weight;
        weight_sum += w.weight;
    }

    if weight_sum == 0.0 {
        0.0
    } else {
        round_score(weighted_total / weight_sum)
    }
}

/// Decimal places kept on category and composite scores.
const SCORE_DECIMALS: i32 = 2;

fn round_score(score: f64) -> f64 {
    let scale = 10f64.powi(SCORE_DECIMALS);
    (score.clamp(0.0, 100.0) * scale).round() / scale
}
