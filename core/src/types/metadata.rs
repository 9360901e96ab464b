use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// One entry of the normalized metadata record, DICOM JSON model style:
/// `{"tag": "0008103E", "Value": [...], "vr": "LO"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagValue {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tag: Option<String>,
    #[serde(rename = "Value", default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vr: String,
}

impl TagValue {
    /// Single-valued string entry, convenient for building records
    pub fn string(s: impl Into<String>) -> Self {
        TagValue {
            tag: None,
            value: vec![serde_json::Value::String(s.into())],
            vr: String::new(),
        }
    }

    /// Numeric entry with one value per multiplicity slot
    pub fn numbers(values: &[f64]) -> Self {
        TagValue {
            tag: None,
            value: values
                .iter()
                .map(|v| {
                    serde_json::Number::from_f64(*v)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                })
                .collect(),
            vr: String::new(),
        }
    }
}

/// Immutable per-series metadata snapshot, keyed by DICOM tag keyword
///
/// Supplied by the external DICOM-reading collaborator as JSON; created
/// once per series and read-only downstream. Accessors never panic and
/// return `None` for absent or ill-typed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesMetadata {
    tags: BTreeMap<String, TagValue>,
}

impl SeriesMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes a record from a reader (e.g. a series JSON file)
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a record from a JSON file on disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Inserts a tag entry, replacing any previous value
    pub fn insert(&mut self, keyword: impl Into<String>, value: TagValue) {
        self.tags.insert(keyword.into(), value);
    }

    pub fn get(&self, keyword: &str) -> Option<&TagValue> {
        self.tags.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.tags.contains_key(keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// First value of a tag as a trimmed string
    ///
    /// Numeric values are rendered in their JSON form; empty strings
    /// count as absent.
    pub fn str_value(&self, keyword: &str) -> Option<String> {
        let first = self.tags.get(keyword)?.value.first()?;
        let s = match first {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }

    /// First value of a tag as a float, parsing strings if necessary
    pub fn f64_value(&self, keyword: &str) -> Option<f64> {
        match self.tags.get(keyword)?.value.first()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// All values of a tag as floats; `None` if any entry is non-numeric
    pub fn f64_list(&self, keyword: &str) -> Option<Vec<f64>> {
        let entry = self.tags.get(keyword)?;
        if entry.value.is_empty() {
            return None;
        }
        entry
            .value
            .iter()
            .map(|v| match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect()
    }

    /// All values of a tag rendered as strings, joined with `,`
    pub fn joined_value(&self, keyword: &str) -> Option<String> {
        let entry = self.tags.get(keyword)?;
        if entry.value.is_empty() {
            return None;
        }
        let parts: Vec<String> = entry
            .value
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect();
        let joined = parts.join(",");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// Copy of this record with the raw pixel buffer removed,
    /// suitable for sidecar persistence
    pub fn without_pixel_data(&self) -> SeriesMetadata {
        let mut tags = self.tags.clone();
        tags.remove("PixelData");
        SeriesMetadata { tags }
    }

    // Named accessors for the tags consulted in several places.

    pub fn series_description(&self) -> Option<String> {
        self.str_value("SeriesDescription")
    }

    pub fn protocol_name(&self) -> Option<String> {
        self.str_value("ProtocolName")
    }

    pub fn sequence_name(&self) -> Option<String> {
        self.str_value("SequenceName")
    }

    pub fn body_part(&self) -> Option<String> {
        self.str_value("BodyPartExamined")
    }

    pub fn series_uid(&self) -> Option<String> {
        self.str_value("SeriesInstanceUID")
    }

    pub fn study_uid(&self) -> Option<String> {
        self.str_value("StudyInstanceUID")
    }

    pub fn study_date(&self) -> Option<String> {
        self.str_value("StudyDate")
            .or_else(|| self.str_value("SeriesDate"))
            .or_else(|| self.str_value("AcquisitionDate"))
    }
}
