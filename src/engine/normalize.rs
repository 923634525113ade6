//! Cross-sectional normalization of one indicator cohort onto a 0–100 scale.

use crate::engine::types::NormalizationMethod;

/// Score given to every member of a cohort with no spread.
pub const DEGENERATE_SCORE: f64 = 50.0;

/// Z-scores are clamped to `[-Z_CLAMP, Z_CLAMP]` before rescaling.
const Z_CLAMP: f64 = 3.0;

/// Normalizes a cohort of raw values for one indicator.
///
/// `output[i]` corresponds to `raw_values[i]`; the output is not sorted.
/// With `is_inverse` the scale is flipped after scaling so that a larger
/// raw value yields a smaller score. Every output lies in `[0, 100]`.
///
/// | Method     | Scaling                                           |
/// |------------|---------------------------------------------------|
/// | MinMax     | `(x - min) / (max - min) * 100`                   |
/// | ZScore     | population z, clamped to ±3, mapped to `[0, 100]` |
/// | Percentile | average rank, `(rank - 1) / (n - 1) * 100`        |
///
/// A cohort with zero spread (identical values, zero standard deviation,
/// or a single percentile member) scores `50.0` everywhere.
pub fn normalize(raw_values: &[f64], method: NormalizationMethod, is_inverse: bool) -> Vec<f64> {
    if raw_values.is_empty() {
        return Vec::new();
    }

    let scaled = match method {
        NormalizationMethod::MinMax => min_max(raw_values),
        NormalizationMethod::ZScore => z_score(raw_values),
        NormalizationMethod::Percentile => percentile(raw_values),
    };

    scaled
        .into_iter()
        .map(|s| if is_inverse { 100.0 - s } else { s })
        .map(|s| s.clamp(0.0, 100.0))
        .collect()
}

fn min_max(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![DEGENERATE_SCORE; values.len()];
    }

    let range = max - min;
    values.iter().map(|x| (x - min) / range * 100.0).collect()
}

fn z_score(values: &[f64]) -> Vec<f64> {
    let mean = population_mean(values);
    let std_dev = population_std_dev(values, mean);

    if std_dev == 0.0 {
        return vec![DEGENERATE_SCORE; values.len()];
    }

    values
        .iter()
        .map(|x| {
            let z = ((x - mean) / std_dev).clamp(-Z_CLAMP, Z_CLAMP);
            (z + Z_CLAMP) / (2.0 * Z_CLAMP) * 100.0
        })
        .collect()
}

fn percentile(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 1 {
        return vec![DEGENERATE_SCORE];
    }

    let ranks = average_ranks(values);
    let denom = (n - 1) as f64;
    ranks.iter().map(|r| (r - 1.0) / denom * 100.0).collect()
}

/// 1-based ranks in input order; tied values share the mean of their ranks.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }

        // positions start..=end hold ranks start+1..=end+1
        let avg_rank = (start + end + 2) as f64 / 2.0;
        for &idx in &order[start..=end] {
            ranks[idx] = avg_rank;
        }
        start = end + 1;
    }

    ranks
}

fn population_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
