use std::collections::BTreeMap;
use std::fmt;

use crate::structure::{SeriesOutcome, SkipReason};

/// End-of-run summary over every processed series
pub struct RunReport<'a> {
    outcomes: &'a [SeriesOutcome],
}

impl<'a> RunReport<'a> {
    pub fn new(outcomes: &'a [SeriesOutcome]) -> Self {
        Self { outcomes }
    }

    pub fn placed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_placed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.placed()
    }

    fn skip_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for outcome in self.outcomes {
            if let SeriesOutcome::Skipped(reason) = outcome {
                *counts.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Structuring Report")?;
        writeln!(f, "==================")?;
        writeln!(f)?;
        writeln!(f, "Series placed:  {}", self.placed())?;
        writeln!(f, "Series skipped: {}", self.skipped())?;
        for (reason, count) in self.skip_counts() {
            writeln!(f, "  {reason}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ModalityBucket, ScanPlacement};
    use crate::types::{CanonicalKey, Dimension, ModalityTag, ViewPlane};

    fn placed() -> SeriesOutcome {
        SeriesOutcome::Placed(ScanPlacement {
            key: CanonicalKey {
                body_part: "SPINE".to_string(),
                dimension: Dimension::TwoD,
                sequence: None,
                contrast: false,
                run: 1,
                view_plane: ViewPlane::Sagittal,
                modality: ModalityTag::T2w,
            },
            bucket: ModalityBucket::Anat,
            files: Vec::new(),
        })
    }

    #[test]
    fn test_counts_and_display() {
        let outcomes = vec![
            placed(),
            placed(),
            SeriesOutcome::Skipped(SkipReason::MissingVolume),
            SeriesOutcome::Skipped(SkipReason::MissingVolume),
            SeriesOutcome::Skipped(SkipReason::ConversionFailed),
        ];
        let report = RunReport::new(&outcomes);
        assert_eq!(report.placed(), 2);
        assert_eq!(report.skipped(), 3);

        let text = report.to_string();
        assert!(text.contains("Series placed:  2"));
        assert!(text.contains("missing-volume: 2"));
        assert!(text.contains("conversion-failed: 1"));
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new(&[]);
        assert_eq!(report.placed(), 0);
        assert_eq!(report.skipped(), 0);
    }
}
