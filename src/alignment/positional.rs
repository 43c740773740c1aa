use crate::types::AlignmentPosition;

/// Index-by-index comparison of phoneme tokens.
///
/// O(n), but a single dropped or inserted phoneme shifts every later position
/// into a substitution. Kept as a cheap fallback; prefer
/// [`EditDistanceAligner`](crate::pipeline::defaults::EditDistanceAligner).
pub fn align_positional(reference: &[String], observed: &[String]) -> Vec<AlignmentPosition> {
    let len = reference.len().max(observed.len());
    (0..len)
        .filter_map(|i| {
            AlignmentPosition::from_slots(reference.get(i).cloned(), observed.get(i).cloned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Classification;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn length_is_max_of_both_sides() {
        assert_eq!(align_positional(&toks("a b c"), &toks("a")).len(), 3);
        assert_eq!(align_positional(&toks("a"), &toks("a b c d")).len(), 4);
        assert!(align_positional(&[], &[]).is_empty());
    }

    #[test]
    fn tail_positions_are_missing_or_extra() {
        let path = align_positional(&toks("k æ t"), &toks("k"));
        assert_eq!(
            path,
            vec![
                AlignmentPosition::paired("k", "k"),
                AlignmentPosition::missing("æ"),
                AlignmentPosition::missing("t"),
            ]
        );

        let path = align_positional(&toks("k"), &toks("k æ"));
        assert_eq!(path[1], AlignmentPosition::extra("æ"));
    }

    #[test]
    fn insertion_shifts_later_positions() {
        let path = align_positional(&toks("k æ t"), &toks("k æ p t"));
        let classes: Vec<_> = path.iter().map(AlignmentPosition::classification).collect();
        assert_eq!(
            classes,
            [
                Classification::Match,
                Classification::Match,
                Classification::Substitution,
                Classification::Extra,
            ]
        );
    }

    #[test]
    fn compares_tokens_not_characters() {
        // "tʃ" vs "t ʃ" differs as tokens even though the characters line up.
        let path = align_positional(&toks("tʃ"), &toks("t ʃ"));
        assert_eq!(
            path,
            vec![AlignmentPosition::paired("tʃ", "t"), AlignmentPosition::extra("ʃ")]
        );
    }
}
