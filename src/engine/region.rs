use crate::engine::aggregate::{category_score, composite_score};
use crate::engine::grade::grade;
use crate::engine::types::{CategoryWeight, IndicatorDatum, RegionScore};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Scores a single region from values already normalized across the full
/// region cohort.
///
/// `category_scores` holds exactly the categories of `indicators_by_category`,
/// in the same order. Pure: identical inputs give an identical result.
pub fn score_region(
    region_id: &str,
    indicators_by_category: &IndexMap<String, Vec<IndicatorDatum>>,
    normalized_values: &HashMap<String, f64>,
    category_weights: &[CategoryWeight],
) -> RegionScore {
    let category_scores: IndexMap<String, f64> = indicators_by_category
        .iter()
        .map(|(category, indicators)| {
            (
                category.clone(),
                category_score(indicators, normalized_values),
            )
        })
        .collect();

    let composite = composite_score(&category_scores, category_weights);

    RegionScore {
        region_id: region_id.to_string(),
        composite_score: composite,
        grade: grade(composite),
        category_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Grade;

    const CATEGORIES: [&str; 6] = [
        "socioeconomic",
        "demographic",
        "health",
        "housing",
        "infrastructure",
        "environmental",
    ];

    /// Eight equally weighted indicators per category, each normalized to
    /// the category's value.
    fn build(
        values: &[f64; 6],
    ) -> (
        IndexMap<String, Vec<IndicatorDatum>>,
        HashMap<String, f64>,
        Vec<CategoryWeight>,
    ) {
        let mut by_category = IndexMap::new();
        let mut normalized = HashMap::new();

        for (category, value) in CATEGORIES.iter().zip(values) {
            let indicators: Vec<_> = (0..8)
                .map(|i| {
                    let id = format!("{category}_{i}");
                    normalized.insert(id.clone(), *value);
                    IndicatorDatum::new(
                        &id,
                        &format!("{category}_indicator_{i}"),
                        category,
                        *value,
                        1.0,
                        false,
                    )
                })
                .collect();
            by_category.insert(category.to_string(), indicators);
        }

        let weights = CATEGORIES
            .iter()
            .map(|c| CategoryWeight::new(c, 1.0 / 6.0))
            .collect();

        (by_category, normalized, weights)
    }

    #[test]
    fn test_uniform_values_reach_every_grade() {
        for (value, expected) in [
            (10.0, Grade::A),
            (30.0, Grade::B),
            (50.0, Grade::C),
            (70.0, Grade::D),
            (90.0, Grade::E),
        ] {
            let (by_category, normalized, weights) = build(&[value; 6]);
            let result = score_region("region", &by_category, &normalized, &weights);

            assert_eq!(result.composite_score, value);
            assert_eq!(result.grade, expected, "value {value}");
            assert_eq!(result.category_scores.len(), 6);
        }
    }

    #[test]
    fn test_mixed_categories() {
        let (by_category, normalized, weights) =
            build(&[20.0, 35.0, 55.0, 65.0, 75.0, 45.0]);
        let result = score_region("region_mixed", &by_category, &normalized, &weights);

        assert_eq!(result.composite_score, 49.17);
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.category_scores["socioeconomic"], 20.0);
        assert_eq!(result.category_scores["housing"], 65.0);
        let order: Vec<_> = result.category_scores.keys().cloned().collect();
        assert_eq!(order, CATEGORIES.map(String::from).to_vec());
    }

    #[test]
    fn test_missing_categories_are_absent_not_zero() {
        let (mut by_category, normalized, weights) = build(&[40.0; 6]);
        by_category.shift_remove("housing");
        let result = score_region("partial", &by_category, &normalized, &weights);

        assert!(!result.category_scores.contains_key("housing"));
        assert_eq!(result.category_scores.len(), 5);
        assert_eq!(result.composite_score, 40.0);
    }

    #[test]
    fn test_all_max_with_uneven_weights_grades_e() {
        let weights = [
            0.0894, 0.2217, 0.5424, 0.6558, 0.5135, 0.8542, 0.2567, 0.2931,
        ];
        let indicators: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                IndicatorDatum::new(
                    &format!("h{i}"),
                    &format!("housing_{i}"),
                    "housing",
                    100.0,
                    *w,
                    false,
                )
            })
            .collect();
        let normalized: HashMap<String, f64> =
            (0..weights.len()).map(|i| (format!("h{i}"), 100.0)).collect();
        let by_category = IndexMap::from([("housing".to_string(), indicators)]);
        let category_weights = [
            CategoryWeight::new("housing", 0.37),
            CategoryWeight::new("health", 0.63),
        ];

        let result = score_region("r", &by_category, &normalized, &category_weights);
        assert_eq!(result.category_scores["housing"], 100.0);
        assert_eq!(result.composite_score, 100.0);
        assert_eq!(result.grade, Grade::E);
    }

    #[test]
    fn test_boundary_uniform_values() {
        let (by_category, normalized, weights) = build(&[100.0; 6]);
        let top = score_region("top", &by_category, &normalized, &weights);
        assert_eq!(top.composite_score, 100.0);
        assert_eq!(top.grade, Grade::E);

        let (by_category, normalized, weights) = build(&[0.0; 6]);
        let bottom = score_region("bottom", &by_category, &normalized, &weights);
        assert_eq!(bottom.composite_score, 0.0);
        assert_eq!(bottom.grade, Grade::A);
        assert!(bottom.category_scores.values().all(|s| *s == 0.0));
    }

    #[test]
    fn test_score_region_is_idempotent() {
        let (by_category, normalized, weights) =
            build(&[12.5, 33.3, 71.0, 64.2, 5.0, 99.9]);
        let first = score_region("r", &by_category, &normalized, &weights);
        let second = score_region("r", &by_category, &normalized, &weights);

        assert_eq!(first, second);
        assert_eq!(
            first.composite_score.to_bits(),
            second.composite_score.to_bits()
        );
    }
}
