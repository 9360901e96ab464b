// The scans field dictionary is one large `json!` literal; the default
// macro recursion limit is too low for it.
#![recursion_limit = "256"]

//! DICOM-to-MIDS dataset structuring engine
//!
//! Classifies imaging series from their metadata records (imaging
//! plane, MRI modality, pulse-sequence family), builds canonical keys,
//! places converted volumes into a BIDS-like `sub-*/ses-*/<bucket>/`
//! hierarchy and aggregates participants/sessions/scans tables.

pub mod classify;
pub mod cli;
pub mod error;
pub mod structure;
pub mod tables;
pub mod types;

pub use classify::{
    approximate_modality, classify_series, contrast_regex, default_modality, default_sequences,
    imaging_plane, match_modality, plane_from_description, search_sequence, Matcher, RuleTable,
};
pub use error::{MidsError, Result};
pub use structure::{
    Changelog, ConvertedSeries, ConverterCommand, DatasetStructurer, ModalityBucket,
    ScanPlacement, SeriesDefaults, SeriesOutcome, SkipReason,
};
pub use tables::{dataset_description, write_dataset_description, MetadataAggregator};
pub use types::{
    CanonicalKey, ClassificationResult, Dimension, ModalityTag, PatientPosition, SequenceName,
    SeriesMetadata, TagValue, ViewPlane,
};
