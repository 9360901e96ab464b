use std::fmt;

/// Imaging plane of a series, optionally oblique
///
/// `Unknown` is the sentinel for series where neither direction cosines
/// nor the description yielded a plane; it renders as an empty string,
/// matching the `vp-` component of keys built from such series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewPlane {
    Unknown,
    Sagittal,
    Coronal,
    Axial,
    SagittalOblique,
    CoronalOblique,
    AxialOblique,
}

impl ViewPlane {
    /// Returns whether this plane is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, ViewPlane::Unknown)
    }

    /// Returns whether the plane carries the oblique suffix
    pub fn is_oblique(&self) -> bool {
        matches!(
            self,
            ViewPlane::SagittalOblique | ViewPlane::CoronalOblique | ViewPlane::AxialOblique
        )
    }

    /// Returns the oblique counterpart of a cardinal plane
    pub fn oblique(&self) -> Self {
        match self {
            ViewPlane::Sagittal => ViewPlane::SagittalOblique,
            ViewPlane::Coronal => ViewPlane::CoronalOblique,
            ViewPlane::Axial => ViewPlane::AxialOblique,
            other => *other,
        }
    }

    /// Full label, e.g. `SAGITTAL-OBLIQUE`; empty for `Unknown`
    pub fn label(&self) -> &'static str {
        match self {
            ViewPlane::Unknown => "",
            ViewPlane::Sagittal => "SAGITTAL",
            ViewPlane::Coronal => "CORONAL",
            ViewPlane::Axial => "AXIAL",
            ViewPlane::SagittalOblique => "SAGITTAL-OBLIQUE",
            ViewPlane::CoronalOblique => "CORONAL-OBLIQUE",
            ViewPlane::AxialOblique => "AXIAL-OBLIQUE",
        }
    }

    /// Short form used in filenames (ax, cor, sag, ax-obl, ...)
    pub fn short_str(&self) -> &'static str {
        match self {
            ViewPlane::Unknown => "",
            ViewPlane::Sagittal => "sag",
            ViewPlane::Coronal => "cor",
            ViewPlane::Axial => "ax",
            ViewPlane::SagittalOblique => "sag-obl",
            ViewPlane::CoronalOblique => "cor-obl",
            ViewPlane::AxialOblique => "ax-obl",
        }
    }

    /// Parses the short form back into a plane
    pub fn from_short(s: &str) -> Self {
        match s {
            "sag" => ViewPlane::Sagittal,
            "cor" => ViewPlane::Coronal,
            "ax" => ViewPlane::Axial,
            "sag-obl" => ViewPlane::SagittalOblique,
            "cor-obl" => ViewPlane::CoronalOblique,
            "ax-obl" => ViewPlane::AxialOblique,
            _ => ViewPlane::Unknown,
        }
    }
}

impl fmt::Display for ViewPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Patient position code from the PatientPosition tag (0018,5100)
///
/// Determines the sign flips applied to the direction cosines before
/// computing the imaging plane. Head-first supine is the default when
/// the tag is absent or unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatientPosition {
    /// Head first, supine
    #[default]
    Hfs,
    /// Feet first, supine
    Ffs,
    /// Head first, prone
    Hfp,
}

impl PatientPosition {
    /// Sign adjustment factors `(lr, ap)` for the cosine triples
    pub fn sign_flips(&self) -> (f64, f64) {
        match self {
            PatientPosition::Hfs => (1.0, 1.0),
            PatientPosition::Ffs => (1.0, -1.0),
            PatientPosition::Hfp => (-1.0, -1.0),
        }
    }

    /// Parses a position code, defaulting to HFS
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "FFS" => PatientPosition::Ffs,
            "HFP" => PatientPosition::Hfp,
            _ => PatientPosition::Hfs,
        }
    }
}

/// Acquisition dimension (MRAcquisitionType or approximated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Dimension {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl Dimension {
    pub fn short_str(&self) -> &'static str {
        match self {
            Dimension::TwoD => "2D",
            Dimension::ThreeD => "3D",
        }
    }

    /// Parses `2D`/`3D`, case-insensitively
    pub fn from_short(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "2D" => Some(Dimension::TwoD),
            "3D" => Some(Dimension::ThreeD),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_str())
    }
}

/// Canonical modality tag catalogue
///
/// Order here is cosmetic; classification precedence lives in the rule
/// table, not in this enum. `Stir` is reachable only through the
/// timing-parameter fallback, never through the regex table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum ModalityTag {
    Unknown,
    Localizer,
    Cal,
    Bold,
    B0,
    Adc,
    Flair,
    Stir,
    Pdw,
    T2starw,
    T1rho,
    Unit1,
    Mrv,
    Mra,
    Pwi,
    Swi,
    Dwi,
    T2w,
    T1w,
}

impl ModalityTag {
    /// Returns whether this tag is the `n/a` sentinel
    pub fn is_unknown(&self) -> bool {
        matches!(self, ModalityTag::Unknown)
    }

    /// Returns whether this is an anatomical modality (routes to mr-anat)
    pub fn is_anatomical(&self) -> bool {
        matches!(
            self,
            ModalityTag::T1w
                | ModalityTag::T2w
                | ModalityTag::T2starw
                | ModalityTag::Flair
                | ModalityTag::Stir
                | ModalityTag::Pdw
                | ModalityTag::T1rho
                | ModalityTag::Unit1
        )
    }

    /// Returns whether this is a localizer or calibration series
    ///
    /// Such series never carry a sequence acronym in their key.
    pub fn is_localizer_like(&self) -> bool {
        matches!(self, ModalityTag::Localizer | ModalityTag::Cal)
    }

    /// Tag string as it appears in keys and tables (`n/a` for unknown)
    pub fn short_str(&self) -> &'static str {
        match self {
            ModalityTag::Unknown => "n/a",
            ModalityTag::Localizer => "localizer",
            ModalityTag::Cal => "CAL",
            ModalityTag::Bold => "BOLD",
            ModalityTag::B0 => "B0",
            ModalityTag::Adc => "ADC",
            ModalityTag::Flair => "FLAIR",
            ModalityTag::Stir => "STIR",
            ModalityTag::Pdw => "PDw",
            ModalityTag::T2starw => "T2starw",
            ModalityTag::T1rho => "T1rho",
            ModalityTag::Unit1 => "UNIT1",
            ModalityTag::Mrv => "MRV",
            ModalityTag::Mra => "MRA",
            ModalityTag::Pwi => "PWI",
            ModalityTag::Swi => "SWI",
            ModalityTag::Dwi => "DWI",
            ModalityTag::T2w => "T2w",
            ModalityTag::T1w => "T1w",
        }
    }

    /// Parses a tag string (as produced by [`short_str`](Self::short_str))
    pub fn from_short(s: &str) -> Self {
        match s {
            "localizer" => ModalityTag::Localizer,
            "CAL" => ModalityTag::Cal,
            "BOLD" => ModalityTag::Bold,
            "B0" => ModalityTag::B0,
            "ADC" => ModalityTag::Adc,
            "FLAIR" => ModalityTag::Flair,
            "STIR" => ModalityTag::Stir,
            "PDw" => ModalityTag::Pdw,
            "T2starw" => ModalityTag::T2starw,
            "T1rho" => ModalityTag::T1rho,
            "UNIT1" => ModalityTag::Unit1,
            "MRV" => ModalityTag::Mrv,
            "MRA" => ModalityTag::Mra,
            "PWI" => ModalityTag::Pwi,
            "SWI" => ModalityTag::Swi,
            "DWI" => ModalityTag::Dwi,
            "T2w" => ModalityTag::T2w,
            "T1w" => ModalityTag::T1w,
            _ => ModalityTag::Unknown,
        }
    }
}

impl fmt::Display for ModalityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_str())
    }
}

/// Vendor-neutral pulse-sequence acronyms
///
/// Listed in the precedence order of the shipped rule table; the
/// GRE-family acronyms overlap heavily, so the table order is the
/// tie-break (see `classify::tables`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceName {
    Mprage,
    Propeller,
    Despot1,
    Despot2,
    Fse,
    Ir,
    Ssge,
    Sge,
    Fge,
    Se,
    Gre,
    Ssfp,
    Pc,
    Tof,
    Epi,
}

impl SequenceName {
    /// Lower-cased acronym used in keys
    pub fn short_str(&self) -> &'static str {
        match self {
            SequenceName::Mprage => "mprage",
            SequenceName::Propeller => "propeller",
            SequenceName::Despot1 => "despot1",
            SequenceName::Despot2 => "despot2",
            SequenceName::Fse => "fse",
            SequenceName::Ir => "ir",
            SequenceName::Ssge => "ssge",
            SequenceName::Sge => "sge",
            SequenceName::Fge => "fge",
            SequenceName::Se => "se",
            SequenceName::Gre => "gre",
            SequenceName::Ssfp => "ssfp",
            SequenceName::Pc => "pc",
            SequenceName::Tof => "tof",
            SequenceName::Epi => "epi",
        }
    }

    /// Parses the lower-cased acronym back into a sequence name
    pub fn from_short(s: &str) -> Option<Self> {
        match s {
            "mprage" => Some(SequenceName::Mprage),
            "propeller" => Some(SequenceName::Propeller),
            "despot1" => Some(SequenceName::Despot1),
            "despot2" => Some(SequenceName::Despot2),
            "fse" => Some(SequenceName::Fse),
            "ir" => Some(SequenceName::Ir),
            "ssge" => Some(SequenceName::Ssge),
            "sge" => Some(SequenceName::Sge),
            "fge" => Some(SequenceName::Fge),
            "se" => Some(SequenceName::Se),
            "gre" => Some(SequenceName::Gre),
            "ssfp" => Some(SequenceName::Ssfp),
            "pc" => Some(SequenceName::Pc),
            "tof" => Some(SequenceName::Tof),
            "epi" => Some(SequenceName::Epi),
            _ => None,
        }
    }
}

impl fmt::Display for SequenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_plane_short_roundtrip() {
        for plane in [
            ViewPlane::Sagittal,
            ViewPlane::Coronal,
            ViewPlane::Axial,
            ViewPlane::SagittalOblique,
            ViewPlane::CoronalOblique,
            ViewPlane::AxialOblique,
        ] {
            assert_eq!(ViewPlane::from_short(plane.short_str()), plane);
        }
        assert_eq!(ViewPlane::from_short(""), ViewPlane::Unknown);
    }

    #[test]
    fn test_view_plane_oblique() {
        assert_eq!(ViewPlane::Axial.oblique(), ViewPlane::AxialOblique);
        assert_eq!(ViewPlane::Axial.oblique().label(), "AXIAL-OBLIQUE");
        assert!(!ViewPlane::Axial.is_oblique());
        assert!(ViewPlane::AxialOblique.is_oblique());
        assert_eq!(ViewPlane::Unknown.oblique(), ViewPlane::Unknown);
    }

    #[test]
    fn test_patient_position_flips() {
        assert_eq!(PatientPosition::Hfs.sign_flips(), (1.0, 1.0));
        assert_eq!(PatientPosition::Ffs.sign_flips(), (1.0, -1.0));
        assert_eq!(PatientPosition::Hfp.sign_flips(), (-1.0, -1.0));
        assert_eq!(PatientPosition::from_str("ffs"), PatientPosition::Ffs);
        assert_eq!(PatientPosition::from_str("garbage"), PatientPosition::Hfs);
    }

    #[test]
    fn test_modality_tag_roundtrip() {
        for tag in [
            ModalityTag::Localizer,
            ModalityTag::Cal,
            ModalityTag::Bold,
            ModalityTag::B0,
            ModalityTag::Adc,
            ModalityTag::Flair,
            ModalityTag::Stir,
            ModalityTag::Pdw,
            ModalityTag::T2starw,
            ModalityTag::T1rho,
            ModalityTag::Unit1,
            ModalityTag::Mrv,
            ModalityTag::Mra,
            ModalityTag::Pwi,
            ModalityTag::Swi,
            ModalityTag::Dwi,
            ModalityTag::T2w,
            ModalityTag::T1w,
        ] {
            assert_eq!(ModalityTag::from_short(tag.short_str()), tag);
        }
        assert_eq!(ModalityTag::Unknown.short_str(), "n/a");
    }

    #[test]
    fn test_modality_tag_families() {
        assert!(ModalityTag::T1w.is_anatomical());
        assert!(ModalityTag::Stir.is_anatomical());
        assert!(!ModalityTag::Bold.is_anatomical());
        assert!(ModalityTag::Localizer.is_localizer_like());
        assert!(ModalityTag::Cal.is_localizer_like());
        assert!(!ModalityTag::T2w.is_localizer_like());
    }

    #[test]
    fn test_sequence_name_roundtrip() {
        assert_eq!(SequenceName::from_short("mprage"), Some(SequenceName::Mprage));
        assert_eq!(SequenceName::from_short("gre"), Some(SequenceName::Gre));
        assert_eq!(SequenceName::from_short("GRE"), None);
        assert_eq!(SequenceName::from_short(""), None);
    }
}
