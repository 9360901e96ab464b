use crate::classify::tables::RuleTable;
use crate::types::ModalityTag;

/// Matches a series description or protocol name against an ordered
/// modality table; first matching rule wins
pub fn match_modality(text: &str, table: &RuleTable<ModalityTag>) -> Option<ModalityTag> {
    if text.is_empty() {
        return None;
    }
    table.first_match(text)
}

/// Approximates the modality from acquisition timing parameters
///
/// All times are in milliseconds; missing values default to 0. The
/// evaluation order is load-bearing: the STIR check can overwrite a
/// FLAIR result from the first check, but once an inversion-based tag
/// fired the T1w/T2w/PDw chain never runs. Keep this shape when
/// editing.
pub fn approximate_modality(
    echo_time: Option<f64>,
    repetition_time: Option<f64>,
    inversion_time: Option<f64>,
) -> Option<ModalityTag> {
    let te = echo_time.unwrap_or(0.0);
    let tr = repetition_time.unwrap_or(0.0);
    let ti = inversion_time.unwrap_or(0.0);

    let mut tag = None;

    if ti > 250.0 && tr > 1500.0 {
        tag = Some(ModalityTag::Flair);
    }

    if ti > 100.0 && tr > 1500.0 && tr < 2700.0 && te < 100.0 {
        tag = Some(ModalityTag::Stir);
    } else if tag.is_none() {
        tag = if te < 30.0 && tr < 800.0 {
            Some(ModalityTag::T1w)
        } else if te > 50.0 && tr < 2500.0 {
            Some(ModalityTag::T2w)
        } else if te < 50.0 && tr > 1000.0 {
            Some(ModalityTag::Pdw)
        } else {
            None
        };
    }

    tag
}
