use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::tables::schema::{
    filtered_fields, participants_fields, scans_mr_fields, sessions_fields, PARTICIPANTS_HEADER,
    SCANS_MICR_HEADER, SCANS_MR_HEADER, SCANS_OP_HEADER, SESSIONS_HEADER,
};
use crate::types::SeriesMetadata;

type Row = BTreeMap<String, String>;

/// Reduces a structured dataset tree into the participants, sessions
/// and scans tables
///
/// One pass over `sub-*/ses-*` in name order; tables are regenerated
/// from scratch on every run, never updated incrementally, so two runs
/// over the same tree produce identical files.
#[derive(Debug)]
pub struct MetadataAggregator {
    root: PathBuf,
    reports: BTreeMap<String, String>,
}

impl MetadataAggregator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MetadataAggregator {
            root: root.into(),
            reports: BTreeMap::new(),
        }
    }

    /// Free-text radiology reports keyed by subject label
    pub fn with_reports(mut self, reports: BTreeMap<String, String>) -> Self {
        self.reports = reports;
        self
    }

    /// Walks the tree and writes every table family
    pub fn aggregate(&self) -> Result<()> {
        let mut participants: Vec<Row> = Vec::new();

        for subject_dir in sorted_subdirs(&self.root, "sub-")? {
            let row = self.aggregate_subject(&subject_dir)?;
            participants.push(row);
        }

        write_tsv(
            &self.root.join("participants.tsv"),
            &PARTICIPANTS_HEADER,
            &participants,
        )?;
        save_json(&self.root.join("participants.json"), &participants_fields())?;
        info!("Wrote participants table ({} subjects)", participants.len());
        Ok(())
    }

    fn aggregate_subject(&self, subject_dir: &Path) -> Result<Row> {
        let subject = dir_name(subject_dir);
        let mut modalities = BTreeSet::new();
        let mut body_parts = BTreeSet::new();
        let mut ages = BTreeSet::new();
        let mut sex: Option<String> = None;
        let mut sessions: Vec<Row> = Vec::new();

        for session_dir in sorted_subdirs(subject_dir, "ses-")? {
            let session = self.aggregate_session(
                &subject,
                &session_dir,
                &mut modalities,
                &mut body_parts,
                &mut ages,
                &mut sex,
            )?;
            sessions.push(session);
        }

        write_tsv(
            &subject_dir.join(format!("{subject}_sessions.tsv")),
            &SESSIONS_HEADER,
            &sessions,
        )?;
        save_json(
            &subject_dir.join(format!("{subject}_sessions.json")),
            &sessions_fields(),
        )?;

        let mut row = Row::new();
        row.insert("participant_id".to_string(), subject.clone());
        row.insert(
            "age".to_string(),
            ages.iter()
                .next()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "n/a".to_string()),
        );
        row.insert("sex".to_string(), sex.unwrap_or_else(|| "n/a".to_string()));
        row.insert("modalities".to_string(), join_distinct(&modalities));
        row.insert("body_parts".to_string(), join_distinct(&body_parts));
        Ok(row)
    }

    fn aggregate_session(
        &self,
        subject: &str,
        session_dir: &Path,
        modalities: &mut BTreeSet<String>,
        body_parts: &mut BTreeSet<String>,
        ages: &mut BTreeSet<i64>,
        sex: &mut Option<String>,
    ) -> Result<Row> {
        let session = dir_name(session_dir);
        let mut scans: Vec<Row> = Vec::new();
        let mut study_uid: Option<String> = None;
        let mut acquisition: Option<NaiveDate> = None;

        for sidecar in sidecar_files(session_dir) {
            let meta = match SeriesMetadata::from_file(&sidecar) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("Skipping sidecar {}: {e}", sidecar.display());
                    continue;
                }
            };

            let modality = meta
                .str_value("Modality")
                .unwrap_or_else(|| "n/a".to_string());
            modalities.insert(modality.clone());
            if let Some(bp) = meta.body_part() {
                body_parts.insert(bp);
            }
            if let Some(s) = meta.str_value("PatientSex") {
                *sex = Some(s);
            }
            if let Some(uid) = meta.study_uid() {
                study_uid = Some(uid);
            }
            if let Some(date) = acquisition_date(&meta) {
                acquisition = Some(date);
            }
            if let Some(age) = compute_age(&meta) {
                ages.insert(age);
            }

            let Some(header) = scans_header_for(&modality) else {
                continue;
            };

            let note = take_note(&sidecar);
            let stem = sidecar
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            for volume in volumes_for_sidecar(&sidecar, stem) {
                let rel = volume
                    .strip_prefix(session_dir)
                    .unwrap_or(&volume)
                    .display()
                    .to_string();
                let mut row = Row::new();
                for column in header {
                    let value = match *column {
                        "scan_file" => rel.clone(),
                        "BodyPart" => meta
                            .body_part()
                            .unwrap_or_else(|| "n/a".to_string()),
                        "note" => note.clone(),
                        tag => meta
                            .joined_value(tag)
                            .unwrap_or_else(|| "n/a".to_string()),
                    };
                    row.insert(column.to_string(), value);
                }
                scans.push(row);
            }
        }

        let columns = surviving_columns(&scans);
        write_tsv_columns(
            &session_dir.join(format!("{subject}_{session}_scans.tsv")),
            &columns,
            &scans,
        )?;
        save_json(
            &session_dir.join(format!("{subject}_{session}_scans.json")),
            &filtered_fields(&scans_mr_fields(), &columns),
        )?;

        let report = self
            .reports
            .get(subject)
            .map(|r| sanitize_report(r))
            .unwrap_or_else(|| "n/a".to_string());

        let mut row = Row::new();
        row.insert("session_id".to_string(), session);
        row.insert(
            "study_uid".to_string(),
            study_uid.unwrap_or_else(|| "n/a".to_string()),
        );
        row.insert(
            "acquisition_date".to_string(),
            acquisition
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "n/a".to_string()),
        );
        row.insert("radiology_report".to_string(), report);
        Ok(row)
    }
}

/// Age in whole years from birth date and acquisition date, else the
/// PatientAge tag with non-digits stripped
pub fn compute_age(meta: &SeriesMetadata) -> Option<i64> {
    let birthday = meta
        .str_value("PatientBirthDate")
        .and_then(|s| parse_dicom_date(&s));
    let acquired = acquisition_date(meta);
    if let (Some(birth), Some(acq)) = (birthday, acquired) {
        return Some(((acq - birth).num_days() as f64 / 365.25) as i64);
    }
    let age = meta.str_value("PatientAge")?;
    let digits: String = age.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// AcquisitionDate, falling back to StudyDate
pub fn acquisition_date(meta: &SeriesMetadata) -> Option<NaiveDate> {
    meta.str_value("AcquisitionDate")
        .and_then(|s| parse_dicom_date(&s))
        .or_else(|| {
            meta.str_value("StudyDate")
                .and_then(|s| parse_dicom_date(&s))
        })
}

/// Accepts `YYYYMMDD` (optionally with a trailing time) and ISO dates
fn parse_dicom_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if s.len() >= 8 {
        return NaiveDate::parse_from_str(&s[..8], "%Y%m%d").ok();
    }
    None
}

/// Strips everything but word characters and non-newline whitespace
pub fn sanitize_report(report: &str) -> String {
    report
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || *c == '_' || (c.is_whitespace() && *c != '\n' && *c != '\r')
        })
        .collect()
}

fn scans_header_for(modality: &str) -> Option<&'static [&'static str]> {
    match modality {
        "MR" => Some(&SCANS_MR_HEADER),
        "OP" | "SC" | "XC" | "OT" => Some(&SCANS_OP_HEADER),
        "SM" => Some(&SCANS_MICR_HEADER),
        _ => None,
    }
}

/// Union of all table headers in declaration order, restricted to
/// columns with at least one real value
fn surviving_columns(rows: &[Row]) -> Vec<String> {
    let mut columns = Vec::new();
    for header in [
        &SCANS_MR_HEADER[..],
        &SCANS_OP_HEADER[..],
        &SCANS_MICR_HEADER[..],
    ] {
        for column in header {
            if columns.iter().any(|c: &String| c == column) {
                continue;
            }
            let survives = rows
                .iter()
                .any(|row| row.get(*column).is_some_and(|v| v != "n/a"));
            if survives {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

/// Reads and removes the free-text note next to a sidecar, if any
fn take_note(sidecar: &Path) -> String {
    let note_path = sidecar.with_extension("txt");
    if !note_path.exists() {
        return "n/a".to_string();
    }
    match fs::read_to_string(&note_path) {
        Ok(note) => {
            fs::remove_file(&note_path).ok();
            if note.trim().is_empty() {
                "n/a".to_string()
            } else {
                note.trim().to_string()
            }
        }
        Err(e) => {
            warn!("Could not read note {}: {e}", note_path.display());
            "n/a".to_string()
        }
    }
}

/// Volume files belonging to a sidecar: same stem, `.nii`/`.nii.gz`
/// extension, with a `_chunk-<N>` component matching any chunk index
fn volumes_for_sidecar(sidecar: &Path, stem: &str) -> Vec<PathBuf> {
    let dir = match sidecar.parent() {
        Some(dir) => dir,
        None => return Vec::new(),
    };
    let chunk = stem.find("_chunk-");
    let mut volumes: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            let Some(name) = p.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            if !name.contains(".nii") {
                return false;
            }
            match chunk {
                Some(pos) => name.starts_with(&stem[..pos]) && name.contains("_chunk-"),
                None => name.starts_with(stem),
            }
        })
        .collect();
    volumes.sort();
    volumes
}

/// Sidecar metadata files under a session directory, in path order;
/// previously written table documents are not sidecars
fn sidecar_files(session_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(session_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension().is_some_and(|e| e == "json")
                && p.file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| !s.ends_with("_scans") && !s.ends_with("_sessions"))
        })
        .collect()
}

fn sorted_subdirs(path: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

fn join_distinct(values: &BTreeSet<String>) -> String {
    let joined = values
        .iter()
        .filter(|v| !v.is_empty() && *v != "n/a")
        .cloned()
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        "n/a".to_string()
    } else {
        joined
    }
}

fn write_tsv(path: &Path, columns: &[&str], rows: &[Row]) -> Result<()> {
    let owned: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    write_tsv_columns(path, &owned, rows)
}

/// Missing cells serialize as `n/a`
fn write_tsv_columns(path: &Path, columns: &[String], rows: &[Row]) -> Result<()> {
    if columns.is_empty() {
        fs::write(path, "")?;
        return Ok(());
    }
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        let record: Vec<&str> = columns
            .iter()
            .map(|c| row.get(c).map(String::as_str).unwrap_or("n/a"))
            .collect();
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_json(path: &Path, value: &Value) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagValue;
    use serde_json::json;

    fn write_sidecar(dir: &Path, stem: &str, meta: &SeriesMetadata) {
        fs::create_dir_all(dir).unwrap();
        let json_path = dir.join(format!("{stem}.json"));
        fs::write(&json_path, serde_json::to_string(meta).unwrap()).unwrap();
        fs::write(dir.join(format!("{stem}.nii.gz")), b"gz").unwrap();
    }

    fn mr_meta() -> SeriesMetadata {
        let mut meta = SeriesMetadata::new();
        meta.insert("Modality", TagValue::string("MR"));
        meta.insert("BodyPartExamined", TagValue::string("LSPINE"));
        meta.insert("SeriesDescription", TagValue::string("SAG T2 TSE"));
        meta.insert("SeriesNumber", TagValue::numbers(&[5.0]));
        meta.insert("EchoTime", TagValue::numbers(&[92.0]));
        meta.insert("StudyInstanceUID", TagValue::string("1.2.840.1"));
        meta.insert("StudyDate", TagValue::string("20200315"));
        meta.insert("PatientBirthDate", TagValue::string("19800310"));
        meta.insert("PatientSex", TagValue::string("F"));
        meta
    }

    fn dataset(root: &Path) {
        let session = root.join("sub-PID001").join("ses-01").join("mr-anat");
        write_sidecar(
            &session,
            "sub-PID001_ses-01_bp-LSPINE_acq-2D-fse_run-01_vp-sag_mod-T2w",
            &mr_meta(),
        );
    }

    #[test]
    fn test_compute_age_from_dates() {
        let meta = mr_meta();
        assert_eq!(compute_age(&meta), Some(40));
    }

    #[test]
    fn test_compute_age_from_patient_age_tag() {
        let mut meta = SeriesMetadata::new();
        meta.insert("PatientAge", TagValue::string("032Y"));
        assert_eq!(compute_age(&meta), Some(32));
        assert_eq!(compute_age(&SeriesMetadata::new()), None);
    }

    #[test]
    fn test_sanitize_report() {
        assert_eq!(
            sanitize_report("Disc herniation, L4/L5.\nNo stenosis!"),
            "Disc herniation L4L5No stenosis"
        );
    }

    #[test]
    fn test_aggregate_writes_all_tables() {
        let tmp = tempfile::tempdir().unwrap();
        dataset(tmp.path());

        let mut reports = BTreeMap::new();
        reports.insert("sub-PID001".to_string(), "All fine.".to_string());
        MetadataAggregator::new(tmp.path())
            .with_reports(reports)
            .aggregate()
            .unwrap();

        let participants =
            fs::read_to_string(tmp.path().join("participants.tsv")).unwrap();
        let mut lines = participants.lines();
        assert_eq!(
            lines.next().unwrap(),
            "participant_id\tage\tsex\tmodalities\tbody_parts"
        );
        assert_eq!(lines.next().unwrap(), "sub-PID001\t40\tF\tMR\tLSPINE");

        let sessions = fs::read_to_string(
            tmp.path().join("sub-PID001").join("sub-PID001_sessions.tsv"),
        )
        .unwrap();
        assert!(sessions.contains("ses-01\t1.2.840.1\t2020-03-15\tAll fine"));

        let scans_path = tmp
            .path()
            .join("sub-PID001")
            .join("ses-01")
            .join("sub-PID001_ses-01_scans.tsv");
        let scans = fs::read_to_string(&scans_path).unwrap();
        let header = scans.lines().next().unwrap();
        assert!(header.starts_with("scan_file\tBodyPart\tModality"));
        // All-missing columns are dropped before writing.
        assert!(!header.contains("InversionTime"));
        assert!(scans.contains("mr-anat/sub-PID001_ses-01_bp-LSPINE_acq-2D-fse_run-01_vp-sag_mod-T2w.nii.gz"));

        let fields: Value = serde_json::from_str(
            &fs::read_to_string(scans_path.with_extension("json")).unwrap(),
        )
        .unwrap();
        assert!(fields.get("EchoTime").is_some());
        assert!(fields.get("InversionTime").is_none());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        dataset(tmp.path());

        let aggregator = MetadataAggregator::new(tmp.path());
        aggregator.aggregate().unwrap();
        let first = fs::read_to_string(tmp.path().join("participants.tsv")).unwrap();
        aggregator.aggregate().unwrap();
        let second = fs::read_to_string(tmp.path().join("participants.tsv")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_note_is_folded_in_and_removed() {
        let tmp = tempfile::tempdir().unwrap();
        dataset(tmp.path());
        let stem = "sub-PID001_ses-01_bp-LSPINE_acq-2D-fse_run-01_vp-sag_mod-T2w";
        let note_path = tmp
            .path()
            .join("sub-PID001")
            .join("ses-01")
            .join("mr-anat")
            .join(format!("{stem}.txt"));
        fs::write(&note_path, "check artifact").unwrap();

        MetadataAggregator::new(tmp.path()).aggregate().unwrap();

        let scans = fs::read_to_string(
            tmp.path()
                .join("sub-PID001")
                .join("ses-01")
                .join("sub-PID001_ses-01_scans.tsv"),
        )
        .unwrap();
        assert!(scans.contains("check artifact"));
        assert!(!note_path.exists(), "note must be consumed");
    }

    #[test]
    fn test_missing_birth_date_yields_na_age() {
        let tmp = tempfile::tempdir().unwrap();
        let mut meta = mr_meta();
        meta.insert("PatientBirthDate", TagValue::string(""));
        let session = tmp.path().join("sub-PID003").join("ses-01").join("mr-anat");
        write_sidecar(&session, "scan_run-01", &meta);

        MetadataAggregator::new(tmp.path()).aggregate().unwrap();
        let participants = fs::read_to_string(tmp.path().join("participants.tsv")).unwrap();
        assert!(participants.contains("sub-PID003\tn/a\tF\tMR\tLSPINE"));
    }

    #[test]
    fn test_empty_tree_produces_empty_participants() {
        let tmp = tempfile::tempdir().unwrap();
        MetadataAggregator::new(tmp.path()).aggregate().unwrap();
        let participants = fs::read_to_string(tmp.path().join("participants.tsv")).unwrap();
        assert_eq!(participants.lines().count(), 1);
    }

    #[test]
    fn test_parse_dicom_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 15);
        assert_eq!(parse_dicom_date("20200315"), expected);
        assert_eq!(parse_dicom_date("2020-03-15"), expected);
        assert_eq!(parse_dicom_date("20200315123000.00"), expected);
        assert_eq!(parse_dicom_date(""), None);
    }

    #[test]
    fn test_extra_json_value_types_do_not_break_rows() {
        // PixelSpacing is multi-valued; joined with a comma.
        let tmp = tempfile::tempdir().unwrap();
        let mut meta = mr_meta();
        meta.insert("PixelSpacing", TagValue::numbers(&[0.5, 0.5]));
        let session = tmp.path().join("sub-PID002").join("ses-01").join("mr-anat");
        write_sidecar(&session, "scan_run-01", &meta);

        MetadataAggregator::new(tmp.path()).aggregate().unwrap();
        let scans = fs::read_to_string(
            tmp.path()
                .join("sub-PID002")
                .join("ses-01")
                .join("sub-PID002_ses-01_scans.tsv"),
        )
        .unwrap();
        assert!(scans.contains("0.5,0.5"));
    }

    #[test]
    fn test_description_value_is_object() {
        assert!(participants_fields().is_object());
        assert_eq!(json!(PARTICIPANTS_HEADER.len()), json!(5));
    }
}
