use clap::Parser;
use log::info;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process;

use dicom2mids_core::MetadataAggregator;

/// Regenerate the participants/sessions/scans tables of an existing
/// MIDS dataset
#[derive(Parser, Debug)]
#[command(name = "midstables")]
#[command(about = "Aggregate metadata tables for a structured MIDS dataset")]
#[command(version)]
struct Cli {
    /// Dataset root (the directory holding sub-* folders)
    #[arg(value_name = "DATASET")]
    dataset: PathBuf,

    /// JSON file mapping subject labels to radiology report texts
    #[arg(long, value_name = "FILE")]
    reports: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if !cli.dataset.is_dir() {
        eprintln!("Error: {} is not a directory", cli.dataset.display());
        process::exit(1);
    }

    let reports = match cli.reports.as_deref().map(load_reports).transpose() {
        Ok(reports) => reports.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: cannot read reports: {e}");
            process::exit(1);
        }
    };

    info!("Aggregating tables under {}", cli.dataset.display());
    if let Err(e) = MetadataAggregator::new(&cli.dataset)
        .with_reports(reports)
        .aggregate()
    {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn load_reports(path: &std::path::Path) -> dicom2mids_core::Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let mut reports = BTreeMap::new();
    if let Some(object) = value.as_object() {
        for (subject, report) in object {
            if let Some(text) = report.as_str() {
                reports.insert(subject.clone(), text.to_string());
            }
        }
    }
    Ok(reports)
}
