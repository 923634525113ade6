//! Output formatting and persistence for score records.
//!
//! Supports full JSON documents and a flat CSV summary that can be appended
//! to across runs.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::{Grade, NormalizationMethod};
use crate::pipeline::ScoreRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One flat CSV row per score; category breakdowns live in the JSON output.
#[derive(Debug, Serialize)]
pub struct ScoreSummary<'a> {
    pub region_id: &'a str,
    pub year: i32,
    pub composite_score: f64,
    pub grade: Grade,
    pub risk_index: Option<f64>,
    pub normalization_method: NormalizationMethod,
    pub indicators_count: usize,
}

impl<'a> From<&'a ScoreRecord> for ScoreSummary<'a> {
    fn from(record: &'a ScoreRecord) -> Self {
        ScoreSummary {
            region_id: &record.region_id,
            year: record.year,
            composite_score: record.composite_score,
            grade: record.grade,
            risk_index: record.risk_index,
            normalization_method: record.normalization_method,
            indicators_count: record.indicators_count,
        }
    }
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `value` to `path` as pretty-printed JSON, replacing the file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed to write '{path}'"))?;
    debug!(path, "Wrote JSON output");
    Ok(())
}

/// Appends one summary row per record to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summaries(path: &str, records: &[ScoreRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV summaries");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(ScoreSummary::from(record))?;
    }
    writer.flush()?;

    Ok(())
}
