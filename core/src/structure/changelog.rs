use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Why a series was skipped instead of placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The per-series metadata record could not be read or parsed
    MetadataUnreadable,
    /// No converted volume file exists for the series
    MissingVolume,
    /// The classified modality maps to no bucket
    UnroutableModality,
    /// The external converter exited with a non-zero status
    ConversionFailed,
    /// Moving the volume or its sidecar failed
    MoveFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::MetadataUnreadable => "metadata-unreadable",
            SkipReason::MissingVolume => "missing-volume",
            SkipReason::UnroutableModality => "unroutable-modality",
            SkipReason::ConversionFailed => "conversion-failed",
            SkipReason::MoveFailed => "move-failed",
        };
        write!(f, "{s}")
    }
}

/// One processed file: where it came from, where it went (or why not)
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogEntry {
    pub subject: String,
    pub study_date: String,
    pub series_uid: String,
    pub source: String,
    pub target: String,
    pub outcome: String,
}

/// Accumulates one entry per processed file and flushes them as a TSV
///
/// A completed run always writes the changelog, even when every series
/// was skipped; the log is the audit trail for what a re-run would see.
#[derive(Debug, Default)]
pub struct Changelog {
    entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    pub fn record_placed(
        &mut self,
        subject: &str,
        study_date: &str,
        series_uid: &str,
        source: &Path,
        target: &Path,
    ) {
        self.entries.push(ChangelogEntry {
            subject: subject.to_string(),
            study_date: study_date.to_string(),
            series_uid: series_uid.to_string(),
            source: source.display().to_string(),
            target: target.display().to_string(),
            outcome: "placed".to_string(),
        });
    }

    pub fn record_skipped(
        &mut self,
        subject: &str,
        study_date: &str,
        series_uid: &str,
        source: &Path,
        reason: &SkipReason,
    ) {
        self.entries.push(ChangelogEntry {
            subject: subject.to_string(),
            study_date: study_date.to_string(),
            series_uid: series_uid.to_string(),
            source: source.display().to_string(),
            target: String::new(),
            outcome: format!("skipped: {reason}"),
        });
    }

    /// Writes all entries as a tab-separated table
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
        writer.write_record(["subject", "study_date", "series_uid", "source", "target", "outcome"])?;
        for entry in &self.entries {
            writer.write_record([
                &entry.subject,
                &entry.study_date,
                &entry.series_uid,
                &entry.source,
                &entry.target,
                &entry.outcome,
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
