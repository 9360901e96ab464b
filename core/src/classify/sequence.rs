use crate::classify::tables::RuleTable;
use crate::types::SequenceName;

/// Resolves the vendor-neutral sequence acronym for a series
///
/// Two ordered passes over the same table: the series description is
/// consulted first, and the vendor sequence name only when the
/// description matched nothing. Within each pass the first matching
/// rule wins.
pub fn search_sequence(
    sequence_name: &str,
    description: &str,
    table: &RuleTable<SequenceName>,
) -> Option<SequenceName> {
    let from_description = if description.is_empty() {
        None
    } else {
        table.first_match(description)
    };
    from_description.or_else(|| {
        if sequence_name.is_empty() {
            None
        } else {
            table.first_match(sequence_name)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tables::default_sequences;
    use rstest::rstest;

    #[rstest]
    #[case("SAG T1 MPRAGE", SequenceName::Mprage)]
    #[case("t2 blade ax", SequenceName::Propeller)]
    #[case("VFA-T1 mapping", SequenceName::Despot1)]
    #[case("AX T2 TSE", SequenceName::Fse)]
    #[case("TIRM dark fluid", SequenceName::Ir)]
    #[case("trufi FISP cine", SequenceName::Ssge)]
    #[case("FLASH 3D", SequenceName::Sge)]
    #[case("LAVA flex", SequenceName::Fge)]
    #[case("spin echo t1", SequenceName::Se)]
    #[case("AX GE hemo", SequenceName::Gre)]
    #[case("time of flight carotid", SequenceName::Tof)]
    fn test_description_pass(#[case] desc: &str, #[case] expected: SequenceName) {
        assert_eq!(
            search_sequence("", desc, default_sequences()),
            Some(expected)
        );
    }

    #[test]
    fn test_sequence_name_pass_only_when_description_fails() {
        // Description yields nothing, vendor sequence name does.
        assert_eq!(
            search_sequence("VIBE_2", "routine brain", default_sequences()),
            Some(SequenceName::Fge) // TurboFLASH family
        );
        // Description wins even when the sequence name would match a
        // different acronym.
        assert_eq!(
            search_sequence("tse2d1", "AX GE hemo", default_sequences()),
            Some(SequenceName::Gre)
        );
    }

    #[test]
    fn test_gre_family_order() {
        // FISP must resolve to SSGE before the broader GRE rule fires.
        assert_eq!(
            search_sequence("", "FISP localizer", default_sequences()),
            Some(SequenceName::Ssge)
        );
        // SPGR belongs to the spoiled-GE family.
        assert_eq!(
            search_sequence("", "SPGR 3D", default_sequences()),
            Some(SequenceName::Sge)
        );
    }

    #[test]
    fn test_gre_family_vendor_overlaps() {
        // FFE and GRE appear in several alternations; the SSGE entry
        // comes first and owns these common vendor strings.
        assert_eq!(
            search_sequence("", "T1_FFE_sag", default_sequences()),
            Some(SequenceName::Ssge)
        );
        assert_eq!(
            search_sequence("", "GRE hemo", default_sequences()),
            Some(SequenceName::Ssge)
        );
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(search_sequence("", "", default_sequences()), None);
        assert_eq!(search_sequence("xyz", "abcd", default_sequences()), None);
    }
}
