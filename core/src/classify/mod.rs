//! Rule-based series classification
//!
//! Three independent classifiers (orientation, modality, sequence)
//! plus the composition that turns a [`SeriesMetadata`] snapshot into
//! a [`ClassificationResult`]. Everything here is a pure function of
//! its inputs and the rule tables; nothing raises on unclassifiable
//! input — sentinels (`Unknown` / `None`) flow through instead.

pub mod modality;
pub mod orientation;
pub mod sequence;
pub mod tables;

pub use modality::{approximate_modality, match_modality};
pub use orientation::{imaging_plane, plane_from_description};
pub use sequence::search_sequence;
pub use tables::{contrast_regex, default_modality, default_sequences, Matcher, RuleTable};

use log::debug;

use crate::types::{
    ClassificationResult, Dimension, ModalityTag, PatientPosition, SequenceName, SeriesMetadata,
};

/// Strips a description down to alphanumerics, spaces, `_`, `+` and
/// `*`, upper-cased, to make regex matching robust against stray
/// punctuation
pub fn sanitize_description(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '+' | '*'))
        .collect::<String>()
        .to_uppercase()
}

/// Approximates the acquisition dimension from the AcquisitionMatrix
/// tag: two or more positive entries mean an in-plane (2D) encode,
/// anything else is treated as 3D
pub fn dimension_from_matrix(acquisition_matrix: &[f64]) -> Dimension {
    if acquisition_matrix.iter().filter(|v| **v > 0.0).count() >= 2 {
        Dimension::TwoD
    } else {
        Dimension::ThreeD
    }
}

/// Classifies one series from its metadata snapshot
///
/// Composition order follows the structuring pipeline: orientation
/// from cosines (description fallback), modality from the protocol
/// name, then the sanitized description, then the timing parameters;
/// sequence acronym only for non-localizer series; contrast from the
/// raw description. Deterministic for a fixed record and tables.
pub fn classify_series(
    meta: &SeriesMetadata,
    modality_table: &RuleTable<ModalityTag>,
    sequence_table: &RuleTable<SequenceName>,
) -> ClassificationResult {
    let description = meta.series_description().unwrap_or_default();
    let clean_description = sanitize_description(&description);

    let position = meta
        .str_value("PatientPosition")
        .map(|s| PatientPosition::from_str(&s))
        .unwrap_or_default();
    let view_plane = match meta.f64_list("ImageOrientationPatient") {
        Some(cosines) => imaging_plane(&cosines, position),
        None => plane_from_description(&description),
    };

    let modality = meta
        .protocol_name()
        .and_then(|p| match_modality(&p, modality_table))
        .or_else(|| match_modality(&clean_description, modality_table))
        .or_else(|| {
            approximate_modality(
                meta.f64_value("EchoTime"),
                meta.f64_value("RepetitionTime"),
                meta.f64_value("InversionTime"),
            )
        })
        .unwrap_or(ModalityTag::Unknown);

    let dimension = meta
        .str_value("MRAcquisitionType")
        .and_then(|s| Dimension::from_short(&s))
        .unwrap_or_else(|| {
            dimension_from_matrix(&meta.f64_list("AcquisitionMatrix").unwrap_or_default())
        });

    // Localizer and calibration series carry no sequence acronym.
    let sequence = if modality.is_localizer_like() {
        None
    } else {
        let vendor_name = meta
            .sequence_name()
            .or_else(|| meta.protocol_name())
            .unwrap_or_default();
        search_sequence(&vendor_name, &clean_description, sequence_table)
    };

    let contrast = contrast_regex().is_match(&description);
    let contrast_agent = if contrast {
        meta.str_value("ContrastBolusAgent")
    } else {
        None
    };

    let result = ClassificationResult {
        view_plane,
        modality,
        sequence,
        dimension,
        contrast,
        contrast_agent,
    };
    debug!(
        "classified series `{}`: plane={:?} modality={} sequence={:?} dim={}",
        description, result.view_plane, result.modality, result.sequence, result.dimension
    );
    result
}
