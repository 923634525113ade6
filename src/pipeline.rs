//! Two-phase batch scoring.
//!
//! Normalization is cross-sectional: every indicator must be normalized
//! across the full region cohort of a year before any region of that year
//! can be scored. [`normalize_cohort`] is the first phase and produces a
//! [`NormalizedCohort`]; [`score_cohort`] is the second. Both phases fan out
//! with rayon, per indicator and per region respectively.

use crate::catalog::Catalog;
use crate::engine::{
    Grade, IndicatorDatum, NormalizationMethod, RegionScore, ValidationResult, normalize,
    risk_index, score_region, validate,
};
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// One raw measurement of an indicator for a region and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIndicatorValue {
    pub region_id: String,
    pub indicator_id: String,
    pub year: i32,
    pub value: f64,
}

/// Normalized values of one year, grouped per region in first-seen order.
#[derive(Debug, Clone)]
pub struct NormalizedCohort {
    pub year: i32,
    pub method: NormalizationMethod,
    regions: IndexMap<String, HashMap<String, f64>>,
}

impl NormalizedCohort {
    /// Normalized values of `region_id`, keyed by indicator id.
    pub fn region_values(&self, region_id: &str) -> Option<&HashMap<String, f64>> {
        self.regions.get(region_id)
    }

    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A region's score for one year, as handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub region_id: String,
    pub year: i32,
    pub composite_score: f64,
    pub grade: Grade,
    pub category_scores: IndexMap<String, f64>,
    pub risk_index: Option<f64>,
    pub normalization_method: NormalizationMethod,
    pub indicators_count: usize,
    pub calculated_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn from_region_score(
        score: RegionScore,
        year: i32,
        method: NormalizationMethod,
        indicators_count: usize,
    ) -> Self {
        ScoreRecord {
            region_id: score.region_id,
            year,
            composite_score: score.composite_score,
            grade: score.grade,
            category_scores: score.category_scores,
            risk_index: None,
            normalization_method: method,
            indicators_count,
            calculated_at: Utc::now(),
        }
    }

    /// Attach the risk index derived from this record's composite score and
    /// three externally computed macro scores.
    pub fn with_risk_index(mut self, resources: f64, pressure: f64, funding: f64) -> Self {
        self.risk_index = Some(risk_index(
            self.composite_score,
            resources,
            pressure,
            funding,
        ));
        self
    }
}

/// Splits raw values by year, ascending.
pub fn split_by_year(values: &[RawIndicatorValue]) -> BTreeMap<i32, Vec<RawIndicatorValue>> {
    let mut by_year: BTreeMap<i32, Vec<RawIndicatorValue>> = BTreeMap::new();
    for value in values {
        by_year.entry(value.year).or_default().push(value.clone());
    }
    by_year
}

/// Phase one: normalizes every indicator across all regions of `year`.
///
/// Rows for indicators missing from the catalog are skipped. A row from
/// another year or a second row for the same region and indicator is an
/// error.
#[tracing::instrument(skip(values, catalog), fields(rows = values.len()))]
pub fn normalize_cohort(
    year: i32,
    values: &[RawIndicatorValue],
    catalog: &Catalog,
    method: NormalizationMethod,
) -> Result<NormalizedCohort, PipelineError> {
    let mut seen = HashSet::new();
    let mut regions: IndexMap<String, HashMap<String, f64>> = IndexMap::new();
    let mut by_indicator: IndexMap<&str, Vec<&RawIndicatorValue>> = IndexMap::new();
    let mut skipped = 0usize;

    for row in values {
        if row.year != year {
            return Err(PipelineError::MixedYears {
                expected: year,
                found: row.year,
            });
        }
        if catalog.indicator(&row.indicator_id).is_none() {
            skipped += 1;
            continue;
        }
        if !seen.insert((row.region_id.as_str(), row.indicator_id.as_str())) {
            return Err(PipelineError::DuplicateValue {
                region_id: row.region_id.clone(),
                indicator_id: row.indicator_id.clone(),
                year,
            });
        }

        regions.entry(row.region_id.clone()).or_default();
        by_indicator
            .entry(row.indicator_id.as_str())
            .or_default()
            .push(row);
    }

    if skipped > 0 {
        warn!(skipped, "Skipped values for indicators missing from the catalog");
    }

    let cohorts: Vec<_> = by_indicator.into_iter().collect();
    let normalized: Vec<_> = cohorts
        .into_par_iter()
        .map(|(indicator_id, rows)| {
            let is_inverse = catalog
                .indicator(indicator_id)
                .is_some_and(|spec| spec.is_inverse);
            let raw: Vec<f64> = rows.iter().map(|r| r.value).collect();
            let scores = normalize(&raw, method, is_inverse);
            (indicator_id, rows, scores)
        })
        .collect();

    debug!(indicators = normalized.len(), regions = regions.len(), "Cohort normalized");

    for (indicator_id, rows, scores) in normalized {
        for (row, score) in rows.into_iter().zip(scores) {
            if let Some(region) = regions.get_mut(&row.region_id) {
                region.insert(indicator_id.to_string(), score);
            }
        }
    }

    Ok(NormalizedCohort {
        year,
        method,
        regions,
    })
}

/// Phase two: scores every region of a normalized cohort.
///
/// Records come back in the cohort's region order.
#[tracing::instrument(skip(cohort, catalog), fields(year = cohort.year, regions = cohort.len()))]
pub fn score_cohort(cohort: &NormalizedCohort, catalog: &Catalog) -> Vec<ScoreRecord> {
    let regions: Vec<_> = cohort.regions.iter().collect();

    regions
        .into_par_iter()
        .map(|(region_id, values)| {
            let by_category = indicators_by_category(catalog, values);
            let score = score_region(region_id, &by_category, values, catalog.category_weights());
            ScoreRecord::from_region_score(score, cohort.year, cohort.method, values.len())
        })
        .collect()
}

/// Groups a region's normalized indicators by category, both in catalog
/// order. Categories without any value for the region are left out.
fn indicators_by_category(
    catalog: &Catalog,
    values: &HashMap<String, f64>,
) -> IndexMap<String, Vec<IndicatorDatum>> {
    let mut by_category: IndexMap<String, Vec<IndicatorDatum>> = catalog
        .category_weights()
        .iter()
        .map(|c| (c.name.clone(), Vec::new()))
        .collect();

    for spec in catalog.indicators() {
        let Some(&value) = values.get(&spec.id) else {
            continue;
        };
        if let Some(bucket) = by_category.get_mut(&spec.category) {
            bucket.push(IndicatorDatum::new(
                &spec.id,
                &spec.name,
                &spec.category,
                value,
                spec.weight,
                spec.is_inverse,
            ));
        }
    }

    by_category.retain(|_, indicators| !indicators.is_empty());
    by_category
}

/// Runs both phases for every year in `values`, oldest year first.
#[tracing::instrument(skip(values, catalog), fields(rows = values.len()))]
pub fn score_all(
    values: &[RawIndicatorValue],
    catalog: &Catalog,
    method: NormalizationMethod,
) -> Result<Vec<ScoreRecord>, PipelineError> {
    let mut records = Vec::new();

    for (year, rows) in split_by_year(values) {
        let cohort = normalize_cohort(year, &rows, catalog, method)?;
        let scored = score_cohort(&cohort, catalog);
        info!(year, regions = scored.len(), "Scored cohort");
        records.extend(scored);
    }

    Ok(records)
}

/// Validates raw values per region.
///
/// With `restrict_to_percentages` only indicators the catalog marks as
/// percentages are checked against the 100 ceiling. Rows for unknown
/// indicators are not checked.
pub fn validate_values(
    values: &[RawIndicatorValue],
    catalog: &Catalog,
    restrict_to_percentages: bool,
) -> IndexMap<String, ValidationResult> {
    let percentages = restrict_to_percentages.then(|| catalog.percentage_indicators());

    let mut by_region: IndexMap<&str, Vec<IndicatorDatum>> = IndexMap::new();
    for row in values {
        let Some(spec) = catalog.indicator(&row.indicator_id) else {
            continue;
        };
        by_region
            .entry(row.region_id.as_str())
            .or_default()
            .push(IndicatorDatum::new(
                &spec.id,
                &spec.name,
                &spec.category,
                row.value,
                spec.weight,
                spec.is_inverse,
            ));
    }

    by_region
        .into_iter()
        .map(|(region_id, indicators)| {
            (
                region_id.to_string(),
                validate(&indicators, percentages.as_ref()),
            )
        })
        .collect()
}
