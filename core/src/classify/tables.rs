//! Ordered rule tables: the classification policy
//!
//! Classification is a pure function of these tables. Each table is an
//! explicit, ordered list of `(label, matcher)` pairs; list order is
//! the tie-break rule, because patterns are deliberately not disjoint
//! (broad T1w/T2w entries come last so narrower rules pre-empt them).
//! The classifiers receive a table as an argument, so tests can
//! substitute smaller ones; the shipped policy lives in
//! [`default_modality`] and [`default_sequences`].
//!
//! The source tables used Python look-arounds (`(?=.*a)(?=.*b)` and
//! `(?!...)`), which the `regex` crate does not support; those entries
//! are expressed as [`Matcher::Conjunction`] instead — same semantics,
//! still one ordered table.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{ModalityTag, SequenceName};

/// A single classification predicate over free text
#[derive(Debug)]
pub enum Matcher {
    /// One case-insensitive alternation
    Pattern(Regex),
    /// Every `all` pattern must match and no `none` pattern may match
    Conjunction { all: Vec<Regex>, none: Vec<Regex> },
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("invalid rule pattern")
}

impl Matcher {
    pub fn any(pattern: &str) -> Self {
        Matcher::Pattern(compile(pattern))
    }

    pub fn all_of(patterns: &[&str]) -> Self {
        Matcher::Conjunction {
            all: patterns.iter().map(|p| compile(p)).collect(),
            none: Vec::new(),
        }
    }

    pub fn all_of_none_of(all: &[&str], none: &[&str]) -> Self {
        Matcher::Conjunction {
            all: all.iter().map(|p| compile(p)).collect(),
            none: none.iter().map(|p| compile(p)).collect(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(text),
            Matcher::Conjunction { all, none } => {
                all.iter().all(|re| re.is_match(text))
                    && !none.iter().any(|re| re.is_match(text))
            }
        }
    }
}

/// Ordered list of `(label, matcher)` rules; first match wins
#[derive(Debug, Default)]
pub struct RuleTable<T> {
    rules: Vec<(T, Matcher)>,
}

impl<T: Copy> RuleTable<T> {
    pub fn new(rules: Vec<(T, Matcher)>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the label of the first rule matching `text`
    pub fn first_match(&self, text: &str) -> Option<T> {
        self.rules
            .iter()
            .find(|(_, matcher)| matcher.is_match(text))
            .map(|(label, _)| *label)
    }
}

/// Shipped modality table (spec order; earlier entries pre-empt later,
/// broader ones)
pub fn default_modality() -> &'static RuleTable<ModalityTag> {
    static TABLE: OnceLock<RuleTable<ModalityTag>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use ModalityTag::*;
        RuleTable::new(vec![
            (
                Localizer,
                Matcher::any(
                    r"localizer|localiser|survey|loc\.|\bscout\b|3-plane|^loc|AdjGre|topogram|three_plane_loc|3plane|3_plane|three_plane|POSDISP|POS",
                ),
            ),
            (Localizer, Matcher::all_of(&["plane", "loc"])),
            (Localizer, Matcher::all_of(&["plane", "survey"])),
            (Cal, Matcher::all_of(&["HO", "shim"])),
            (Cal, Matcher::any(r"\bHOS\b|_HOS_|shim|calibration|calib")),
            (Bold, Matcher::any(r"bold|fmri|resting|rest")),
            (B0, Matcher::all_of(&["field", "map"])),
            (B0, Matcher::all_of(&["bias", "ch"])),
            (B0, Matcher::any(r"field|fmap|topup|DISTORTION|se[-_][aprl]{2}$")),
            (
                Adc,
                Matcher::any(
                    r"_ADC$|^ADC|isoADC|AvDC|Average_DC|_TRACEW$|APPARENT DIFFUSION",
                ),
            ),
            (
                Flair,
                Matcher::any(r"flair|FluidAttenuatedInversionRecovery|CSFSuppressed"),
            ),
            (Flair, Matcher::all_of(&[r"\bDARK\b", r"\bFLUID\b"])),
            (Pdw, Matcher::any(r"\bPD\b|_PD_|_PD|PD_")),
            (
                T2starw,
                Matcher::any(r"\bT2\*\b|_T2\*_|_T2\*|T2\*_|T2\*|t2star|t2starw"),
            ),
            (
                T1rho,
                Matcher::any(r"\bT1rho\b|_T1rho_|_T1rho|T1rho_|^t1rho|_t1rho$"),
            ),
            (Unit1, Matcher::any(r"MPRAGE")),
            (Mrv, Matcher::any(r"mrv")),
            (Mra, Matcher::any(r"^mra|_mra$|_mra_")),
            (
                Pwi,
                Matcher::any(
                    r"asl|tof|perfusion|angio|cbf|cerebral_blood_flow|cbv|rBV_map|rBF_map|mtt_map|ttp_rgb",
                ),
            ),
            (Pwi, Matcher::all_of(&["blood", "flow"])),
            (Pwi, Matcher::all_of(&["art", "spin"])),
            (
                Swi,
                Matcher::any(r"swi|susceptibility|suscept|swan|Mag[ _]images|Pha[ _]images|\bSW\b"),
            ),
            (
                Dwi,
                Matcher::any(r"dti|dwi|diffu|diffusion|difusion|\bdiff\b|hardi"),
            ),
            (Dwi, Matcher::all_of(&["diff", "dir"])),
            (T2w, Matcher::any(r".t2|t2w?|ciss|fiesta|haste")),
            (T1w, Matcher::any(r".t1|t1w?")),
            (T1w, Matcher::all_of_none_of(&["3d anat"], &["inplane"])),
            (T1w, Matcher::all_of_none_of(&["3d", "bravo"], &["inplane"])),
            (T1w, Matcher::any(r"bravo|spgr|stir")),
        ])
    })
}

/// Shipped sequence-acronym table
///
/// GRE-family entries (SSGE/SGE/FGE/GRE) overlap heavily on purpose:
/// FFE and GRE appear in several alternations and the earliest entry
/// wins, so vendor strings like `T1_FFE` resolve to SSGE. Keep this
/// order when editing.
pub fn default_sequences() -> &'static RuleTable<SequenceName> {
    static TABLE: OnceLock<RuleTable<SequenceName>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use SequenceName::*;
        RuleTable::new(vec![
            (Mprage, Matcher::any(r"MPRAGE")),
            (
                Propeller,
                Matcher::any(r"PROPELLER|BLADE|MultiVane|VANE|RADAR|JET"),
            ),
            (Despot1, Matcher::any(r"DESPOT1|VFA[\s\-_]*T1")),
            (Despot2, Matcher::any(r"DESPOT2|VFA[\s\-_]*T2")),
            (
                Fse,
                Matcher::any(
                    r"FAST[\s\-_]*SPIN[\s\-_]*ECHO|TURBO[\s\-_]*SE|FAST[\s\-_]*SE|SSH\-TSE|UFSE|SSTSE|HASTE|SS\-FSE|TSE|CUBE|VISTA|isoFSE|FSE",
                ),
            ),
            (
                Ir,
                Matcher::any(
                    r"INVERSION[\s\-_]*RECOVERY|IR[\s\-_]*RSE|IRM|TIRM|Fast[\s\-_]*IR|FSE\-IR|FIR|\bIR\b",
                ),
            ),
            (
                Ssge,
                Matcher::any(r"SteadyState[\s\-_]*GE|BFFE|FFE|FISP|MPGR|GRE|TRSG|SSGE"),
            ),
            (
                Sge,
                Matcher::any(r"SPOILED[\s\-_]*GE|FFE|FLASH|SPGR|MPSPGR|RSSG|RF\-spoiled"),
            ),
            (
                Fge,
                Matcher::any(
                    r"FAST[\s\-_]*GE|FFE|TFE|THRIVE|TurboFLASH|VIBE|BRAVO|FGRE|Fast[\s\-_]*SPGR|FMPSPGR|VIBRANT|FAME|LAVA|R\-TFE|FSPGR",
                ),
            ),
            (Se, Matcher::any(r"\bSE\b|SPIN[\s\-_]*ECHO")),
            (Gre, Matcher::any(r"FFE|GRE|\bGE\b|\bFE\b")),
            (Ssfp, Matcher::any(r"SSFP|FIESTA|TRUEFISP|B\-FFE")),
            (Pc, Matcher::any(r"PHASE[\s\-_]*CONTRAST|\bPC\b")),
            (Tof, Matcher::any(r"TIME[\s\-_]*OF[\s\-_]*FLIGHT|TOF")),
            (Epi, Matcher::any(r"EPI")),
        ])
    })
}

/// Contrast-agent / contrast-phase keyword set, anchored at the start
/// of the description (the source policy used anchored matching)
pub fn contrast_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^(GAD(O|AVIST)?|[+-]GD|GD[+-]|[+-]C\b|C[+-]|CONTRAST|P[0O]ST|\d{1,2}(ML|CC)|ENHANCE|CONTR|INFUSION|INJECT|MINUTE|AFTER|LATE)",
        )
        .expect("invalid contrast pattern")
    })
}
