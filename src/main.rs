//! CLI entry point for the SVI scoring engine.
//!
//! Provides subcommands for scoring a table of raw indicator values,
//! validating it, normalizing an ad-hoc cohort, and blending a risk index.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use svi_engine::catalog::Catalog;
use svi_engine::engine::{NormalizationMethod, normalize, risk_index};
use svi_engine::input::load_raw_values;
use svi_engine::output::{append_summaries, print_json, write_json};
use svi_engine::pipeline::{score_all, validate_values};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "svi_engine")]
#[command(about = "Social vulnerability index scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, aggregate and grade every region of every year in a CSV
    Score {
        /// CSV of raw values: region_id,indicator_id,year,value
        #[arg(short, long)]
        input: String,

        /// Indicator catalog JSON
        #[arg(short, long, env = "SVI_CATALOG_PATH")]
        catalog: String,

        /// Normalization method applied to every indicator cohort
        #[arg(short, long, value_enum, default_value_t = NormalizationMethod::MinMax)]
        method: NormalizationMethod,

        /// Only score this year
        #[arg(short, long)]
        year: Option<i32>,

        /// JSON file to write score records to
        #[arg(short, long, default_value = "scores.json")]
        output: String,

        /// Optional: CSV file to append one summary row per score to
        #[arg(long)]
        summary_csv: Option<String>,

        /// Score even when validation reports errors
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Resources macro score; with --pressure and --funding, attaches a
        /// risk index to every record
        #[arg(long, requires_all = ["pressure", "funding"])]
        resources: Option<f64>,

        /// Pressure macro score
        #[arg(long, requires_all = ["resources", "funding"])]
        pressure: Option<f64>,

        /// Funding macro score
        #[arg(long, requires_all = ["resources", "pressure"])]
        funding: Option<f64>,
    },
    /// Check raw values for negative or out-of-range magnitudes
    Validate {
        /// CSV of raw values: region_id,indicator_id,year,value
        #[arg(short, long)]
        input: String,

        /// Indicator catalog JSON
        #[arg(short, long, env = "SVI_CATALOG_PATH")]
        catalog: String,

        /// Check every indicator against 100, not only percentages
        #[arg(long, default_value_t = false)]
        all_indicators: bool,
    },
    /// Normalize a single cohort of values given on the command line
    Normalize {
        #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        #[arg(short, long, value_enum, default_value_t = NormalizationMethod::MinMax)]
        method: NormalizationMethod,

        /// Higher raw values mean lower vulnerability
        #[arg(long, default_value_t = false)]
        inverse: bool,
    },
    /// Blend a vulnerability index with resources, pressure and funding scores
    Risk {
        vulnerability: f64,
        resources: f64,
        pressure: f64,
        funding: f64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/svi_engine.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("svi_engine.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            catalog,
            method,
            year,
            output,
            summary_csv,
            force,
            resources,
            pressure,
            funding,
        } => {
            let macros = match (resources, pressure, funding) {
                (Some(r), Some(p), Some(f)) => Some((r, p, f)),
                _ => None,
            };
            score(
                &input,
                &catalog,
                method,
                year,
                &output,
                summary_csv.as_deref(),
                force,
                macros,
            )?;
        }
        Commands::Validate {
            input,
            catalog,
            all_indicators,
        } => {
            let catalog = Catalog::load(&catalog)?;
            let values = load_raw_values(&input)?;
            if !report_validation(&values, &catalog, !all_indicators) {
                bail!("validation failed for {input}");
            }
            info!("All values passed validation");
        }
        Commands::Normalize {
            values,
            method,
            inverse,
        } => {
            let normalized = normalize(&values, method, inverse);
            print_json(&normalized)?;
        }
        Commands::Risk {
            vulnerability,
            resources,
            pressure,
            funding,
        } => {
            let risk = risk_index(vulnerability, resources, pressure, funding);
            info!(risk_index = risk, "Risk index");
        }
    }

    Ok(())
}

/// Validates, then scores all cohorts in `input` and writes the results.
///
/// `macros` holds the resources, pressure and funding scores blended into
/// each record's risk index.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(skip(method, summary_csv, force, macros), fields(method = %method))]
fn score(
    input: &str,
    catalog: &str,
    method: NormalizationMethod,
    year: Option<i32>,
    output: &str,
    summary_csv: Option<&str>,
    force: bool,
    macros: Option<(f64, f64, f64)>,
) -> Result<()> {
    let catalog = Catalog::load(catalog)?;
    let mut values = load_raw_values(input)?;
    if let Some(year) = year {
        values.retain(|v| v.year == year);
    }

    info!(
        rows = values.len(),
        indicators = catalog.indicators().len(),
        categories = catalog.category_weights().len(),
        "Inputs loaded"
    );

    if !report_validation(&values, &catalog, true) {
        if force {
            warn!("Validation errors present, scoring anyway (--force)");
        } else {
            bail!("validation failed; fix the input or pass --force");
        }
    }

    let mut records = score_all(&values, &catalog, method)?;
    if let Some((resources, pressure, funding)) = macros {
        records = records
            .into_iter()
            .map(|r| r.with_risk_index(resources, pressure, funding))
            .collect();
        info!(resources, pressure, funding, "Risk index attached");
    }

    write_json(output, &records)?;
    if let Some(path) = summary_csv {
        append_summaries(path, &records)?;
    }

    info!(scores = records.len(), output, "Scoring complete");
    Ok(())
}

/// Logs every finding; returns whether all regions are valid.
fn report_validation(
    values: &[svi_engine::pipeline::RawIndicatorValue],
    catalog: &Catalog,
    restrict_to_percentages: bool,
) -> bool {
    let results = validate_values(values, catalog, restrict_to_percentages);
    let mut invalid_regions = 0;

    for (region_id, result) in &results {
        for w in result.warnings() {
            warn!(region_id = %region_id, indicator_id = %w.indicator_id, "{}", w.message);
        }
        for e in result.errors() {
            error!(region_id = %region_id, indicator_id = %e.indicator_id, "{}", e.message);
        }
        if !result.is_valid() {
            invalid_regions += 1;
        }
    }

    info!(
        regions = results.len(),
        invalid_regions, "Validation summary"
    );
    invalid_regions == 0
}
