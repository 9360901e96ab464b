use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Keys the builder owns; caller-supplied extras can never override
/// them
pub const PROTECTED_KEYS: [&str; 9] = [
    "Name",
    "BIDSVersion",
    "DatasetType",
    "License",
    "Authors",
    "Acknowledgements",
    "Funding",
    "Doi",
    "PathPatterns",
];

/// Builds the `dataset_description.json` document
///
/// Fixed skeleton with the tool recorded under `GeneratedBy`; `extras`
/// are merged in afterwards, skipping the protected keys.
pub fn dataset_description(name: &str, extras: &Map<String, Value>) -> Value {
    let mut description = json!({
        "Name": name,
        "BIDSVersion": "1.9.0",
        "DatasetType": "mids",
        "License": extras.get("License").cloned().unwrap_or_else(|| json!("CC BY-NC-SA 4.0")),
        "Authors": extras.get("Authors").cloned().unwrap_or_else(|| json!([])),
        "Acknowledgements": extras.get("Acknowledgements").cloned().unwrap_or_else(|| json!("")),
        "HowToAcknowledge": "Please cite the papers",
        "ReferencesAndLinks": extras.get("Reference").cloned().map(|r| json!([r])).unwrap_or_else(|| json!([])),
        "DatasetDOI": extras.get("Doi").cloned().unwrap_or_else(|| json!("")),
        "GeneratedBy": [
            {
                "Name": "dicom2mids",
                "Version": env!("CARGO_PKG_VERSION")
            }
        ],
        "SourceDatasets": []
    });

    let object = description.as_object_mut().unwrap();
    for (key, value) in extras {
        if !PROTECTED_KEYS.contains(&key.as_str()) {
            object.insert(key.clone(), value.clone());
        }
    }
    description
}

/// Writes the description under `root/dataset_description.json`
pub fn write_dataset_description(root: &Path, description: &Value) -> Result<()> {
    let file = fs::File::create(root.join("dataset_description.json"))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), description)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys() {
        let description = dataset_description("Spinal Disease Dataset", &Map::new());
        assert_eq!(description["Name"], "Spinal Disease Dataset");
        assert_eq!(description["BIDSVersion"], "1.9.0");
        assert_eq!(description["DatasetType"], "mids");
        assert_eq!(description["GeneratedBy"][0]["Name"], "dicom2mids");
        assert_eq!(
            description["GeneratedBy"][0]["Version"],
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_extras_merge_but_protected_keys_win() {
        let mut extras = Map::new();
        extras.insert("Name".to_string(), json!("smuggled"));
        extras.insert("DatasetType".to_string(), json!("raw"));
        extras.insert("Funding".to_string(), json!("grant 42"));
        extras.insert("BodyPartExamined".to_string(), json!(["LSPINE"]));

        let description = dataset_description("Real Name", &extras);
        assert_eq!(description["Name"], "Real Name");
        assert_eq!(description["DatasetType"], "mids");
        assert!(description.get("Funding").is_none());
        assert_eq!(description["BodyPartExamined"], json!(["LSPINE"]));
    }

    #[test]
    fn test_write() {
        let dir = tempfile::tempdir().unwrap();
        let description = dataset_description("X", &Map::new());
        write_dataset_description(dir.path(), &description).unwrap();
        let written: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("dataset_description.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written, description);
    }
}
