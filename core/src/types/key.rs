use std::fmt;

use crate::error::MidsError;
use crate::types::enums::{Dimension, ModalityTag, SequenceName, ViewPlane};

/// Canonical series identifier used for both placement and naming
///
/// Renders as
/// `bp-<part>_acq-<dim>[-<seq>][ce]_run-<NN>_vp-<plane>_mod-<modality>[ce]`
/// and parses back losslessly, so a filename stem is a faithful record
/// of the classification that produced it. Identical classifications
/// yield identical keys except for the run counter, which is assigned
/// per (subject, session, bucket) by the structurer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    pub body_part: String,
    pub dimension: Dimension,
    pub sequence: Option<SequenceName>,
    pub contrast: bool,
    pub run: u32,
    pub view_plane: ViewPlane,
    pub modality: ModalityTag,
}

impl CanonicalKey {
    /// Returns this key with a different run index
    pub fn with_run(&self, run: u32) -> Self {
        CanonicalKey {
            run,
            ..self.clone()
        }
    }

    /// Key string with the run component zeroed, used to group
    /// collision candidates within a bucket
    pub fn base(&self) -> String {
        self.with_run(0).to_string()
    }

    /// Parses a key string produced by [`Display`](fmt::Display)
    pub fn parse(s: &str) -> crate::error::Result<Self> {
        fn component<'a>(part: Option<&'a str>, prefix: &str, full: &str) -> Result<&'a str, MidsError> {
            part.and_then(|p| p.strip_prefix(prefix))
                .ok_or_else(|| MidsError::InvalidKey(format!("missing `{prefix}` in `{full}`")))
        }

        let mut parts = s.split('_');
        let body_part = component(parts.next(), "bp-", s)?.to_string();
        let acq = component(parts.next(), "acq-", s)?;
        let run_str = component(parts.next(), "run-", s)?;
        let plane_str = component(parts.next(), "vp-", s)?;
        let mod_str = component(parts.next(), "mod-", s)?;
        if parts.next().is_some() {
            return Err(MidsError::InvalidKey(format!("trailing components in `{s}`")));
        }

        let (dim_str, seq_part) = match acq.split_once('-') {
            Some((d, rest)) => (d, Some(rest)),
            None => (acq, None),
        };

        // The `ce` contrast marker is appended to the last piece of the
        // acquisition component (the sequence when present, the
        // dimension otherwise) and to the modality; any one of them is
        // enough to recover it.
        let mut contrast = false;
        let dimension = match Dimension::from_short(dim_str) {
            Some(dim) => dim,
            None => {
                let trimmed = dim_str.strip_suffix("ce").ok_or_else(|| {
                    MidsError::InvalidKey(format!("bad dimension `{dim_str}` in `{s}`"))
                })?;
                contrast = true;
                Dimension::from_short(trimmed).ok_or_else(|| {
                    MidsError::InvalidKey(format!("bad dimension `{trimmed}` in `{s}`"))
                })?
            }
        };

        let sequence = match seq_part {
            None => None,
            Some(seq) => match SequenceName::from_short(seq) {
                Some(sq) => Some(sq),
                None => {
                    let trimmed = seq.strip_suffix("ce").ok_or_else(|| {
                        MidsError::InvalidKey(format!("bad sequence `{seq}` in `{s}`"))
                    })?;
                    contrast = true;
                    Some(SequenceName::from_short(trimmed).ok_or_else(|| {
                        MidsError::InvalidKey(format!("bad sequence `{trimmed}` in `{s}`"))
                    })?)
                }
            },
        };

        let run: u32 = run_str
            .parse()
            .map_err(|_| MidsError::InvalidKey(format!("bad run `{run_str}` in `{s}`")))?;

        let view_plane = ViewPlane::from_short(plane_str);

        let modality = match ModalityTag::from_short(mod_str) {
            ModalityTag::Unknown => match mod_str.strip_suffix("ce") {
                Some(trimmed) if !ModalityTag::from_short(trimmed).is_unknown() => {
                    contrast = true;
                    ModalityTag::from_short(trimmed)
                }
                _ => ModalityTag::Unknown,
            },
            tag => tag,
        };

        Ok(CanonicalKey {
            body_part,
            dimension,
            sequence,
            contrast,
            run,
            view_plane,
            modality,
        })
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ce = if self.contrast { "ce" } else { "" };
        write!(f, "bp-{}_acq-{}", self.body_part, self.dimension)?;
        if let Some(seq) = self.sequence {
            write!(f, "-{}", seq)?;
        }
        write!(
            f,
            "{}_run-{:02}_vp-{}_mod-{}{}",
            ce,
            self.run,
            self.view_plane.short_str(),
            self.modality,
            ce
        )
    }
}

/// Normalizes a free-text component for filename use: strips every
/// non-alphanumeric character and upper-cases the rest
pub fn normalize_component(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> CanonicalKey {
        CanonicalKey {
            body_part: "LSPINE".to_string(),
            dimension: Dimension::TwoD,
            sequence: Some(SequenceName::Fse),
            contrast: false,
            run: 1,
            view_plane: ViewPlane::Sagittal,
            modality: ModalityTag::T2w,
        }
    }

    #[test]
    fn test_display_format() {
        assert_eq!(
            sample_key().to_string(),
            "bp-LSPINE_acq-2D-fse_run-01_vp-sag_mod-T2w"
        );
    }

    #[test]
    fn test_display_with_contrast() {
        let key = CanonicalKey {
            contrast: true,
            modality: ModalityTag::T1w,
            sequence: Some(SequenceName::Sge),
            ..sample_key()
        };
        assert_eq!(
            key.to_string(),
            "bp-LSPINE_acq-2D-sgece_run-01_vp-sag_mod-T1wce"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let keys = [
            sample_key(),
            CanonicalKey {
                contrast: true,
                sequence: None,
                modality: ModalityTag::Flair,
                view_plane: ViewPlane::AxialOblique,
                run: 12,
                ..sample_key()
            },
            CanonicalKey {
                sequence: Some(SequenceName::Gre),
                contrast: true,
                dimension: Dimension::ThreeD,
                ..sample_key()
            },
            CanonicalKey {
                modality: ModalityTag::Localizer,
                sequence: None,
                view_plane: ViewPlane::Unknown,
                ..sample_key()
            },
        ];
        for key in keys {
            let parsed = CanonicalKey::parse(&key.to_string()).unwrap();
            assert_eq!(parsed, key, "round-trip failed for {}", key);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CanonicalKey::parse("").is_err());
        assert!(CanonicalKey::parse("bp-SPINE_run-01").is_err());
        assert!(CanonicalKey::parse("bp-SPINE_acq-4D_run-01_vp-ax_mod-T1w").is_err());
        assert!(CanonicalKey::parse("bp-SPINE_acq-2D_run-xx_vp-ax_mod-T1w").is_err());
    }

    #[test]
    fn test_base_ignores_run() {
        let a = sample_key();
        let b = a.with_run(7);
        assert_eq!(a.base(), b.base());
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_normalize_component() {
        assert_eq!(normalize_component("L-Spine (lower)"), "LSPINELOWER");
        assert_eq!(normalize_component("  "), "");
        assert_eq!(normalize_component("lspine"), "LSPINE");
    }
}
