//! CSV reader for raw indicator values.

use anyhow::{Context, Result};
use std::io::Read;
use tracing::debug;

use crate::pipeline::RawIndicatorValue;

/// Reads raw values from a CSV file with the header
/// `region_id,indicator_id,year,value`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row does not parse.
pub fn load_raw_values(path: &str) -> Result<Vec<RawIndicatorValue>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("failed to open input '{path}'"))?;
    let rows = read_raw_values(file).with_context(|| format!("failed to parse input '{path}'"))?;
    debug!(path, rows = rows.len(), "Loaded raw indicator values");
    Ok(rows)
}

/// Reads raw values from any CSV source.
pub fn read_raw_values<R: Read>(reader: R) -> Result<Vec<RawIndicatorValue>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: RawIndicatorValue = result?;
        rows.push(record);
    }

    Ok(rows)
}
