use clap::Parser;
use log::{error, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::process;

use dicom2mids_core::cli::report::RunReport;
use dicom2mids_core::cli::Cli;
use dicom2mids_core::tables::{dataset_description, write_dataset_description};
use dicom2mids_core::{ConverterCommand, DatasetStructurer, MetadataAggregator, SeriesDefaults};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if !cli.source.is_dir() {
        eprintln!("Error: {} is not a directory", cli.source.display());
        process::exit(1);
    }
    if let Err(e) = fs::create_dir_all(&cli.output) {
        eprintln!("Error: cannot create {}: {}", cli.output.display(), e);
        process::exit(1);
    }

    let extras = match load_extras(cli.description.as_deref()) {
        Ok(extras) => extras,
        Err(e) => {
            eprintln!("Error: cannot read description extras: {e}");
            process::exit(1);
        }
    };

    info!(
        "Structuring {} into {}",
        cli.source.display(),
        cli.output.display()
    );

    let mut structurer = DatasetStructurer::new(
        &cli.output,
        SeriesDefaults::default(),
        ConverterCommand::new(&cli.converter),
    );

    let outcomes = match structurer.structure_dataset(&cli.source, &cli.subject_prefix) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            error!("Structuring failed: {e}");
            // The changelog still documents everything processed so far.
            if let Err(log_err) = structurer.write_changelog() {
                error!("Could not write changelog: {log_err}");
            }
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = structurer.write_changelog() {
        error!("Could not write changelog: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let description = dataset_description(&cli.name, &extras);
    if let Err(e) = write_dataset_description(&cli.output, &description) {
        error!("Could not write dataset description: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if !cli.skip_tables {
        if let Err(e) = MetadataAggregator::new(&cli.output).aggregate() {
            error!("Table aggregation failed: {e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    print!("{}", RunReport::new(&outcomes));
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_extras(path: Option<&Path>) -> dicom2mids_core::Result<Map<String, Value>> {
    let Some(path) = path else {
        return Ok(Map::new());
    };
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(value.as_object().cloned().unwrap_or_default())
}
