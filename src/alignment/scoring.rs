use std::collections::HashSet;

use crate::types::{AlignmentPosition, AlignmentResult, Classification, Correction};

/// Fraction of reference phonemes produced correctly.
///
/// The denominator is the reference length, so extra phonemes only cost
/// through the matches they displace. An empty reference scores 1.0 against
/// an empty attempt and 0.0 against anything else.
pub fn score_positions(positions: &[AlignmentPosition]) -> f64 {
    let mut reference_len = 0usize;
    let mut matches = 0usize;
    let mut has_observed = false;
    for position in positions {
        if position.reference_token().is_some() {
            reference_len += 1;
        }
        if position.observed_token().is_some() {
            has_observed = true;
        }
        if position.classification() == Classification::Match {
            matches += 1;
        }
    }

    if reference_len == 0 {
        return if has_observed { 0.0 } else { 1.0 };
    }
    (matches as f64 / reference_len as f64).clamp(0.0, 1.0)
}

/// Substitution pairs in first-seen order, each reported once.
pub fn extract_corrections(positions: &[AlignmentPosition]) -> Vec<Correction> {
    let mut seen = HashSet::new();
    let mut corrections = Vec::new();
    for position in positions {
        if position.classification() != Classification::Substitution {
            continue;
        }
        let (Some(observed), Some(reference)) =
            (position.observed_token(), position.reference_token())
        else {
            continue;
        };
        if seen.insert((observed, reference)) {
            corrections.push(Correction {
                observed: observed.to_string(),
                reference: reference.to_string(),
            });
        }
    }
    corrections
}

pub fn build_result(positions: Vec<AlignmentPosition>) -> AlignmentResult {
    let score = score_positions(&positions);
    let corrections = extract_corrections(&positions);
    AlignmentResult::new(positions, score, corrections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reference_and_attempt_is_perfect() {
        assert_eq!(score_positions(&[]), 1.0);
    }

    #[test]
    fn empty_reference_with_attempt_is_zero() {
        assert_eq!(score_positions(&[AlignmentPosition::extra("p")]), 0.0);
    }

    #[test]
    fn extra_phonemes_do_not_enter_denominator() {
        let positions = vec![
            AlignmentPosition::paired("k", "k"),
            AlignmentPosition::extra("p"),
            AlignmentPosition::paired("t", "t"),
        ];
        assert_eq!(score_positions(&positions), 1.0);
    }

    #[test]
    fn missing_and_substituted_lower_score() {
        let positions = vec![
            AlignmentPosition::paired("k", "k"),
            AlignmentPosition::paired("æ", "ɛ"),
            AlignmentPosition::missing("t"),
            AlignmentPosition::paired("s", "s"),
        ];
        assert!((score_positions(&positions) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn corrections_only_come_from_substitutions() {
        let positions = vec![
            AlignmentPosition::missing("h"),
            AlignmentPosition::paired("æ", "ɛ"),
            AlignmentPosition::extra("p"),
        ];
        let corrections = extract_corrections(&positions);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].observed, "ɛ");
        assert_eq!(corrections[0].reference, "æ");
    }

    #[test]
    fn corrections_deduplicate_in_first_seen_order() {
        let positions = vec![
            AlignmentPosition::paired("ɹ", "w"),
            AlignmentPosition::paired("θ", "f"),
            AlignmentPosition::paired("ɹ", "w"),
            AlignmentPosition::paired("θ", "s"),
        ];
        let rendered: Vec<String> = extract_corrections(&positions)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, ["w → ɹ", "f → θ", "s → θ"]);
    }

    #[test]
    fn build_result_carries_all_parts() {
        let result = build_result(vec![
            AlignmentPosition::paired("k", "k"),
            AlignmentPosition::paired("æ", "ɛ"),
            AlignmentPosition::paired("t", "t"),
        ]);
        assert!((result.score() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.positions().len(), 3);
        assert_eq!(result.corrections().len(), 1);
    }
}
