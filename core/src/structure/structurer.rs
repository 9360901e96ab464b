use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{classify_series, default_modality, default_sequences};
use crate::error::Result;
use crate::structure::buckets::ModalityBucket;
use crate::structure::changelog::{Changelog, SkipReason};
use crate::structure::convert::ConverterCommand;
use crate::types::{normalize_component, CanonicalKey, SeriesMetadata, TagValue};

/// Tag values assumed when the series metadata does not carry them
#[derive(Debug, Clone)]
pub struct SeriesDefaults {
    pub modality: String,
    pub body_part: String,
    pub protocol: String,
}

impl Default for SeriesDefaults {
    fn default() -> Self {
        SeriesDefaults {
            modality: "MR".to_string(),
            body_part: "SPINE".to_string(),
            protocol: "TSE".to_string(),
        }
    }
}

/// One converted series ready for placement: who it belongs to, its
/// metadata snapshot and the volume files the converter produced
#[derive(Debug, Clone)]
pub struct ConvertedSeries {
    pub subject: String,
    pub session: u32,
    pub series_dir: PathBuf,
    pub metadata: SeriesMetadata,
    pub volumes: Vec<PathBuf>,
}

/// Where a series ended up
#[derive(Debug, Clone)]
pub struct ScanPlacement {
    pub key: CanonicalKey,
    pub bucket: ModalityBucket,
    pub files: Vec<PathBuf>,
}

/// Per-series result; a skip never aborts the subject or the run
#[derive(Debug, Clone)]
pub enum SeriesOutcome {
    Placed(ScanPlacement),
    Skipped(SkipReason),
}

impl SeriesOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, SeriesOutcome::Placed(_))
    }
}

/// Places converted series into the canonical
/// `sub-<id>/ses-<NN>/<bucket>/` hierarchy
///
/// Owns the run changelog: every processed file leaves a trace, placed
/// or skipped. Never overwrites an existing file; re-running over the
/// same output assigns fresh run indices instead.
#[derive(Debug)]
pub struct DatasetStructurer {
    root: PathBuf,
    defaults: SeriesDefaults,
    converter: ConverterCommand,
    changelog: Changelog,
}

impl DatasetStructurer {
    pub fn new(root: impl Into<PathBuf>, defaults: SeriesDefaults, converter: ConverterCommand) -> Self {
        DatasetStructurer {
            root: root.into(),
            defaults,
            converter,
            changelog: Changelog::new(),
        }
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the accumulated changelog to `<root>/changelog.tsv`
    pub fn write_changelog(&self) -> Result<()> {
        self.changelog.write(&self.root.join("changelog.tsv"))
    }

    /// Converts and places every series under `source`
    ///
    /// Expected layout: `source/<subject>/<study>/<series>/`, one DICOM
    /// series per leaf directory with its metadata record at
    /// `<series>/<series>.json`. Subjects, studies and series are
    /// visited in name order so re-runs see the same sequence.
    pub fn structure_dataset(&mut self, source: &Path, subject_prefix: &str) -> Result<Vec<SeriesOutcome>> {
        let staging = self.root.join("derivatives").join("nifti");
        fs::create_dir_all(&staging)?;

        let mut outcomes = Vec::new();
        for subject_dir in sorted_dirs(source)? {
            let subject = subject_label(subject_prefix, &dir_name(&subject_dir));
            info!("Processing subject {} into {}", subject_dir.display(), subject);

            let mut session = 1u32;
            for session_dir in sorted_dirs(&subject_dir)? {
                for series_dir in sorted_dirs(&session_dir)? {
                    let outcome = self.process_series_dir(&series_dir, &subject, session, &staging);
                    outcomes.push(outcome);
                }
                session += 1;
            }
        }

        fs::remove_dir_all(&staging).ok();
        Ok(outcomes)
    }

    fn process_series_dir(
        &mut self,
        series_dir: &Path,
        subject: &str,
        session: u32,
        staging: &Path,
    ) -> SeriesOutcome {
        let name = dir_name(series_dir);
        let meta_path = series_dir.join(format!("{name}.json"));
        let metadata = match SeriesMetadata::from_file(&meta_path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping {}: unreadable metadata ({e})", series_dir.display());
                self.changelog.record_skipped(
                    subject,
                    "",
                    "",
                    series_dir,
                    &SkipReason::MetadataUnreadable,
                );
                return SeriesOutcome::Skipped(SkipReason::MetadataUnreadable);
            }
        };

        let out_dir = staging
            .join(format!("sub-{subject}"))
            .join(format!("ses-{session:02}"))
            .join(&name);
        if let Err(e) = fs::create_dir_all(&out_dir) {
            warn!("Skipping {}: {e}", series_dir.display());
            self.changelog
                .record_skipped(subject, "", "", series_dir, &SkipReason::MoveFailed);
            return SeriesOutcome::Skipped(SkipReason::MoveFailed);
        }

        if let Err(e) = self.converter.convert(series_dir, &out_dir, &name) {
            warn!("Skipping {}: {e}", series_dir.display());
            self.changelog.record_skipped(
                subject,
                &metadata.study_date().unwrap_or_default(),
                &metadata.series_uid().unwrap_or_default(),
                series_dir,
                &SkipReason::ConversionFailed,
            );
            return SeriesOutcome::Skipped(SkipReason::ConversionFailed);
        }

        let volumes = volume_files(&out_dir);
        self.place_series(&ConvertedSeries {
            subject: subject.to_string(),
            session,
            series_dir: series_dir.to_path_buf(),
            metadata,
            volumes,
        })
    }

    /// Classifies one converted series and moves its volumes and
    /// sidecars into place
    pub fn place_series(&mut self, series: &ConvertedSeries) -> SeriesOutcome {
        let meta = self.with_defaults(&series.metadata);
        let study_date = meta.study_date().unwrap_or_default();
        let series_uid = meta.series_uid().unwrap_or_default();

        if series.volumes.is_empty() {
            warn!("No volume for series {}", series.series_dir.display());
            self.changelog.record_skipped(
                &series.subject,
                &study_date,
                &series_uid,
                &series.series_dir,
                &SkipReason::MissingVolume,
            );
            return SeriesOutcome::Skipped(SkipReason::MissingVolume);
        }

        let classification = classify_series(&meta, default_modality(), default_sequences());
        let bucket = match ModalityBucket::for_modality(classification.modality) {
            Some(bucket) => bucket,
            None => {
                warn!(
                    "No bucket for series {} (modality {})",
                    series.series_dir.display(),
                    classification.modality
                );
                self.changelog.record_skipped(
                    &series.subject,
                    &study_date,
                    &series_uid,
                    &series.series_dir,
                    &SkipReason::UnroutableModality,
                );
                return SeriesOutcome::Skipped(SkipReason::UnroutableModality);
            }
        };

        let body_part = meta
            .body_part()
            .unwrap_or_else(|| self.defaults.body_part.clone());
        let base_key = classification.canonical_key(&body_part, 0);

        let target_dir = self
            .root
            .join(format!("sub-{}", series.subject))
            .join(format!("ses-{:02}", series.session))
            .join(bucket.dir_name());
        if let Err(e) = fs::create_dir_all(&target_dir) {
            warn!("Skipping {}: {e}", series.series_dir.display());
            self.changelog.record_skipped(
                &series.subject,
                &study_date,
                &series_uid,
                &series.series_dir,
                &SkipReason::MoveFailed,
            );
            return SeriesOutcome::Skipped(SkipReason::MoveFailed);
        }

        let sidecar = meta.without_pixel_data();
        let mut files = Vec::new();

        for volume in &series.volumes {
            let equidistant = volume
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains("Eq_"));

            // Next unused run index for this stem family; existing
            // files are never overwritten.
            let mut run = 1u32;
            let (stem, target) = loop {
                let stem = filename_stem(
                    &series.subject,
                    series.session,
                    &base_key.with_run(run),
                    equidistant,
                );
                let candidate = target_dir.join(format!("{stem}.nii.gz"));
                if !candidate.exists() {
                    break (stem, candidate);
                }
                run += 1;
            };

            if let Err(e) = move_file(volume, &target) {
                warn!("Failed to move {}: {e}", volume.display());
                self.changelog.record_skipped(
                    &series.subject,
                    &study_date,
                    &series_uid,
                    volume,
                    &SkipReason::MoveFailed,
                );
                continue;
            }
            if let Err(e) = write_sidecar(&sidecar, &target_dir.join(format!("{stem}.json"))) {
                warn!("Failed to write sidecar for {}: {e}", target.display());
            }

            self.changelog
                .record_placed(&series.subject, &study_date, &series_uid, volume, &target);
            files.push(target);
        }

        if files.is_empty() {
            return SeriesOutcome::Skipped(SkipReason::MoveFailed);
        }
        info!(
            "Placed {} volume(s) for {} as {}",
            files.len(),
            series.series_dir.display(),
            base_key.base()
        );
        SeriesOutcome::Placed(ScanPlacement {
            key: base_key,
            bucket,
            files,
        })
    }

    /// Copy of the record with the default tags filled in where absent
    fn with_defaults(&self, meta: &SeriesMetadata) -> SeriesMetadata {
        let mut filled = meta.clone();
        if !filled.contains("Modality") {
            filled.insert("Modality", TagValue::string(&self.defaults.modality));
        }
        if filled.body_part().is_none() {
            filled.insert("BodyPartExamined", TagValue::string(&self.defaults.body_part));
        }
        if filled.protocol_name().is_none() {
            filled.insert("ProtocolName", TagValue::string(&self.defaults.protocol));
        }
        filled
    }
}

/// `sub-<id>_ses-<NN>_<key>` stem; equidistant reconstructions get a
/// `desc-equidistant` descriptor in front of the run component instead
/// of consuming a run slot of their own family
fn filename_stem(subject: &str, session: u32, key: &CanonicalKey, equidistant: bool) -> String {
    let key_str = key.to_string();
    let key_str = if equidistant {
        key_str.replace("_run-", "_desc-equidistant_run-")
    } else {
        key_str
    };
    format!("sub-{subject}_ses-{session:02}_{key_str}")
}

/// Subject label from a source directory name: prefix plus the first
/// number in the name zero-padded to three digits, or the normalized
/// name when it carries no number
fn subject_label(prefix: &str, dir_name: &str) -> String {
    let digits: String = dir_name.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(n) => format!("{prefix}{n:03}"),
        Err(_) => normalize_component(dir_name),
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Subdirectories of `path` in name order
fn sorted_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Compressed volume files in `dir`, in name order
fn volume_files(dir: &Path) -> Vec<PathBuf> {
    let mut volumes: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".nii.gz") || n.ends_with(".nii"))
        })
        .collect();
    volumes.sort();
    volumes
}

/// Rename, falling back to copy-and-remove across filesystems
fn move_file(source: &Path, target: &Path) -> std::io::Result<()> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }
    fs::copy(source, target)?;
    fs::remove_file(source)
}

fn write_sidecar(meta: &SeriesMetadata, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), meta)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModalityTag;

    fn spine_t2_metadata() -> SeriesMetadata {
        let mut meta = SeriesMetadata::new();
        meta.insert("SeriesDescription", TagValue::string("SAG T2 TSE"));
        meta.insert("BodyPartExamined", TagValue::string("LSPINE"));
        meta.insert("MRAcquisitionType", TagValue::string("2D"));
        meta.insert(
            "ImageOrientationPatient",
            TagValue::numbers(&[0.0, 1.0, 0.0, 0.0, 0.0, -1.0]),
        );
        meta.insert("StudyDate", TagValue::string("20200101"));
        meta.insert("SeriesInstanceUID", TagValue::string("1.2.3.4"));
        meta
    }

    fn fake_series(dir: &Path, subject: &str, meta: SeriesMetadata, volume_name: &str) -> ConvertedSeries {
        let volume = dir.join(volume_name);
        fs::write(&volume, b"gzip").unwrap();
        ConvertedSeries {
            subject: subject.to_string(),
            session: 1,
            series_dir: dir.to_path_buf(),
            metadata: meta,
            volumes: vec![volume],
        }
    }

    fn structurer(root: &Path) -> DatasetStructurer {
        DatasetStructurer::new(root, SeriesDefaults::default(), ConverterCommand::default())
    }

    #[test]
    fn test_place_series_moves_volume_and_sidecar() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut s = structurer(&root);
        let series = fake_series(&src, "PID001", spine_t2_metadata(), "vol.nii.gz");
        let outcome = s.place_series(&series);

        let expected = root
            .join("sub-PID001")
            .join("ses-01")
            .join("mr-anat")
            .join("sub-PID001_ses-01_bp-LSPINE_acq-2D-fse_run-01_vp-sag_mod-T2w.nii.gz");
        assert!(outcome.is_placed());
        assert!(expected.exists());
        assert!(expected.with_extension("").with_extension("json").exists());
        assert!(!series.volumes[0].exists(), "source must be moved, not copied");
        assert_eq!(s.changelog().len(), 1);
    }

    #[test]
    fn test_run_number_disambiguation() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut s = structurer(&root);
        let first = s.place_series(&fake_series(&src, "PID001", spine_t2_metadata(), "a.nii.gz"));
        let second = s.place_series(&fake_series(&src, "PID001", spine_t2_metadata(), "b.nii.gz"));

        let (SeriesOutcome::Placed(a), SeriesOutcome::Placed(b)) = (first, second) else {
            panic!("both series must be placed");
        };
        let name_a = a.files[0].file_name().unwrap().to_str().unwrap().to_string();
        let name_b = b.files[0].file_name().unwrap().to_str().unwrap().to_string();
        assert!(name_a.contains("_run-01_"), "{name_a}");
        assert!(name_b.contains("_run-02_"), "{name_b}");
    }

    #[test]
    fn test_equidistant_variant_gets_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut s = structurer(&root);
        let outcome = s.place_series(&fake_series(&src, "PID001", spine_t2_metadata(), "vol_Eq_1.nii.gz"));

        let SeriesOutcome::Placed(p) = outcome else {
            panic!("series must be placed");
        };
        let name = p.files[0].file_name().unwrap().to_str().unwrap();
        assert!(name.contains("_desc-equidistant_run-01_"), "{name}");
    }

    #[test]
    fn test_unroutable_modality_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut meta = SeriesMetadata::new();
        meta.insert("SeriesDescription", TagValue::string("zzzz"));
        // Neutral protocol so the default "TSE" cannot rescue it, and
        // timing values in the dead zone of the approximation chain.
        meta.insert("ProtocolName", TagValue::string("zzzz"));
        meta.insert("EchoTime", TagValue::numbers(&[40.0]));
        meta.insert("RepetitionTime", TagValue::numbers(&[900.0]));

        let mut s = structurer(&root);
        let outcome = s.place_series(&fake_series(&src, "PID001", meta, "vol.nii.gz"));
        assert!(matches!(
            outcome,
            SeriesOutcome::Skipped(SkipReason::UnroutableModality)
        ));
        assert_eq!(s.changelog().len(), 1);
    }

    #[test]
    fn test_missing_volume_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut s = structurer(&tmp.path().join("mids"));
        let outcome = s.place_series(&ConvertedSeries {
            subject: "PID001".to_string(),
            session: 1,
            series_dir: tmp.path().join("src"),
            metadata: spine_t2_metadata(),
            volumes: Vec::new(),
        });
        assert!(matches!(
            outcome,
            SeriesOutcome::Skipped(SkipReason::MissingVolume)
        ));
    }

    #[test]
    fn test_defaults_fill_missing_body_part() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut meta = spine_t2_metadata();
        meta.insert("BodyPartExamined", TagValue::string(""));

        let mut s = structurer(&root);
        let SeriesOutcome::Placed(p) = s.place_series(&fake_series(&src, "PID001", meta, "v.nii.gz")) else {
            panic!("series must be placed");
        };
        assert_eq!(p.key.body_part, "SPINE");
    }

    #[test]
    fn test_subject_label() {
        assert_eq!(subject_label("PID", "patient-17"), "PID017");
        assert_eq!(subject_label("SDD", "0042"), "SDD042");
        assert_eq!(subject_label("PID", "anonymous"), "ANONYMOUS");
    }

    #[test]
    fn test_filename_stem_classification_drives_modality() {
        // A localizer routes to mr-loc and carries no sequence acronym.
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("mids");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let mut meta = SeriesMetadata::new();
        meta.insert("SeriesDescription", TagValue::string("3-plane scout"));
        meta.insert("ProtocolName", TagValue::string("3-plane scout"));
        meta.insert("BodyPartExamined", TagValue::string("SPINE"));

        let mut s = structurer(&root);
        let SeriesOutcome::Placed(p) = s.place_series(&fake_series(&src, "PID002", meta, "v.nii.gz")) else {
            panic!("series must be placed");
        };
        assert_eq!(p.bucket, ModalityBucket::Loc);
        assert_eq!(p.key.modality, ModalityTag::Localizer);
        assert!(p.files[0].to_str().unwrap().contains("mr-loc"));
    }
}
