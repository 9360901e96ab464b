use std::fmt;

use crate::types::ModalityTag;

/// Modality-bucket subdirectory a scan is routed into
///
/// Fixed grouping of modality tags; the bucket name is the directory
/// under `sub-<id>/ses-<NN>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalityBucket {
    Anat,
    Loc,
    Func,
    Dwi,
    Fmap,
    Perf,
    Angio,
}

impl ModalityBucket {
    /// Directory name under the session directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModalityBucket::Anat => "mr-anat",
            ModalityBucket::Loc => "mr-loc",
            ModalityBucket::Func => "mr-func",
            ModalityBucket::Dwi => "mr-dwi",
            ModalityBucket::Fmap => "mr-fmap",
            ModalityBucket::Perf => "mr-perf",
            ModalityBucket::Angio => "mr-angio",
        }
    }

    /// Routes a modality tag into its bucket; `None` means the series
    /// cannot be placed and must be skipped
    pub fn for_modality(tag: ModalityTag) -> Option<ModalityBucket> {
        use ModalityTag::*;
        match tag {
            t if t.is_anatomical() => Some(ModalityBucket::Anat),
            Localizer | Cal => Some(ModalityBucket::Loc),
            Bold => Some(ModalityBucket::Func),
            Dwi | Adc => Some(ModalityBucket::Dwi),
            B0 => Some(ModalityBucket::Fmap),
            Pwi | Swi => Some(ModalityBucket::Perf),
            Mra | Mrv => Some(ModalityBucket::Angio),
            Unknown => None,
            // is_anatomical covers everything else
            _ => None,
        }
    }
}

impl fmt::Display for ModalityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anatomical_tags_route_to_anat() {
        for tag in [
            ModalityTag::T1w,
            ModalityTag::T2w,
            ModalityTag::Flair,
            ModalityTag::Stir,
            ModalityTag::Pdw,
            ModalityTag::T2starw,
        ] {
            assert_eq!(ModalityBucket::for_modality(tag), Some(ModalityBucket::Anat));
        }
    }

    #[test]
    fn test_bucket_routing() {
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::Localizer),
            Some(ModalityBucket::Loc)
        );
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::Bold),
            Some(ModalityBucket::Func)
        );
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::Adc),
            Some(ModalityBucket::Dwi)
        );
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::B0),
            Some(ModalityBucket::Fmap)
        );
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::Swi),
            Some(ModalityBucket::Perf)
        );
        assert_eq!(
            ModalityBucket::for_modality(ModalityTag::Mra),
            Some(ModalityBucket::Angio)
        );
    }

    #[test]
    fn test_unknown_is_unroutable() {
        assert_eq!(ModalityBucket::for_modality(ModalityTag::Unknown), None);
    }

    #[test]
    fn test_dir_names() {
        assert_eq!(ModalityBucket::Anat.dir_name(), "mr-anat");
        assert_eq!(ModalityBucket::Loc.to_string(), "mr-loc");
    }
}
