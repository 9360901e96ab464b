//! Core type definitions for series classification and placement
//!
//! - [`ViewPlane`], [`PatientPosition`]: imaging-plane inference inputs/outputs
//! - [`ModalityTag`], [`SequenceName`], [`Dimension`]: the canonical catalogue
//! - [`SeriesMetadata`] / [`TagValue`]: the normalized per-series record
//! - [`ClassificationResult`]: the immutable classifier output
//! - [`CanonicalKey`]: the placement/naming identifier

mod classification;
mod enums;
mod key;
mod metadata;

pub use classification::ClassificationResult;
pub use enums::{Dimension, ModalityTag, PatientPosition, SequenceName, ViewPlane};
pub use key::{normalize_component, CanonicalKey};
pub use metadata::{SeriesMetadata, TagValue};
