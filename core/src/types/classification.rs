use serde::Serialize;

use crate::types::enums::{Dimension, ModalityTag, SequenceName, ViewPlane};
use crate::types::key::{normalize_component, CanonicalKey};

/// Deterministic classification of one series
///
/// Derived once from a [`SeriesMetadata`](crate::SeriesMetadata)
/// snapshot and never mutated afterwards. Composes into a
/// [`CanonicalKey`] given a body part and run index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub view_plane: ViewPlane,
    pub modality: ModalityTag,
    pub sequence: Option<SequenceName>,
    pub dimension: Dimension,
    pub contrast: bool,
    /// ContrastBolusAgent label, when the series is contrast-enhanced
    /// and the tag was present
    pub contrast_agent: Option<String>,
}

impl ClassificationResult {
    /// Builds the canonical key for this classification
    ///
    /// The body part is normalized for filename safety; the run index
    /// is a placeholder until the structurer assigns the final one.
    pub fn canonical_key(&self, body_part: &str, run: u32) -> CanonicalKey {
        CanonicalKey {
            body_part: normalize_component(body_part),
            dimension: self.dimension,
            sequence: self.sequence,
            contrast: self.contrast,
            run,
            view_plane: self.view_plane,
            modality: self.modality,
        }
    }
}
