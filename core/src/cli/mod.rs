pub mod report;

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for dicom2mids
#[derive(Parser, Debug)]
#[command(name = "dicom2mids")]
#[command(about = "Structure DICOM series into a MIDS dataset")]
#[command(version)]
pub struct Cli {
    /// Source directory with one subdirectory per subject
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output dataset root
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Prefix for generated subject labels
    #[arg(short = 'p', long, default_value = "PID")]
    pub subject_prefix: String,

    /// External DICOM-to-NIfTI converter program
    #[arg(long, default_value = "dcm2niix")]
    pub converter: String,

    /// Dataset name written into dataset_description.json
    #[arg(short, long, default_value = "MIDS dataset")]
    pub name: String,

    /// JSON file with extra dataset_description.json entries
    #[arg(long, value_name = "FILE")]
    pub description: Option<PathBuf>,

    /// Do not aggregate the participants/sessions/scans tables
    #[arg(long)]
    pub skip_tables: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["dicom2mids", "/in", "/out"]);
        assert_eq!(cli.subject_prefix, "PID");
        assert_eq!(cli.converter, "dcm2niix");
        assert!(!cli.skip_tables);
        assert!(cli.description.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "dicom2mids",
            "/in",
            "/out",
            "-p",
            "SDD",
            "--converter",
            "dcm2niix-dev",
            "--skip-tables",
            "-v",
        ]);
        assert_eq!(cli.subject_prefix, "SDD");
        assert_eq!(cli.converter, "dcm2niix-dev");
        assert!(cli.skip_tables);
        assert!(cli.verbose);
    }
}
