use log::{debug, error};
use std::path::Path;
use std::process::Command;

use crate::error::{MidsError, Result};

/// Driver for the external DICOM-to-NIfTI converter
///
/// The converter is a black box that reads one series directory and
/// leaves compressed volumes in the output directory. A non-zero exit
/// is surfaced as [`MidsError::Conversion`] for that series only.
#[derive(Debug, Clone)]
pub struct ConverterCommand {
    program: String,
}

impl Default for ConverterCommand {
    fn default() -> Self {
        Self::new("dcm2niix")
    }
}

impl ConverterCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ConverterCommand {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Converts one series directory into `output_dir`, naming the
    /// produced volumes after `stem`
    pub fn convert(&self, series_dir: &Path, output_dir: &Path, stem: &str) -> Result<()> {
        // -b n: no converter-generated sidecar (ours is authoritative)
        // -z y: compress, -m y: merge slices of one series
        let output = Command::new(&self.program)
            .arg("-b")
            .arg("n")
            .arg("-z")
            .arg("y")
            .arg("-m")
            .arg("y")
            .arg("-f")
            .arg(stem)
            .arg("-o")
            .arg(output_dir)
            .arg(series_dir)
            .output()?;

        debug!(
            "{} {} -> {}: exit {:?}",
            self.program,
            series_dir.display(),
            output_dir.display(),
            output.status.code()
        );

        if !output.status.success() {
            error!(
                "converter failed for {}: {}",
                series_dir.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(MidsError::Conversion {
                program: self.program.clone(),
                status: output.status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}
