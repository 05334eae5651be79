//! `check` subcommand: load the dataset and report row accounting.

use anyhow::{Context, Result};
use serde::Serialize;
use shelterfinder_cli::output::OutputFormat;
use shelterfinder_lib::{AppConfig, DatasetLoader};

#[derive(Debug, Serialize)]
struct CheckReport {
    source: String,
    rows: usize,
    shelters: usize,
    skipped: usize,
}

pub async fn handle_check(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let loader = DatasetLoader::new(config.dataset.clone());
    let dataset = loader
        .load_dataset()
        .await
        .with_context(|| format!("failed to load dataset from {}", loader.source()))?;

    let report = CheckReport {
        source: loader.source().to_string(),
        rows: dataset.total_rows,
        shelters: dataset.records.len(),
        skipped: dataset.skipped_rows,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!(
            "{}: {} shelters usable, {} of {} rows skipped (missing or invalid coordinates)",
            report.source, report.shelters, report.skipped, report.rows
        ),
    }
    Ok(())
}
