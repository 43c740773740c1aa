use crate::types::LocalizedResult;

/// Pick the best-scoring locale variant.
///
/// Scores within `epsilon` of each other are ties. A tie goes to
/// `preferred_locale` when it is one of the tied variants, otherwise to the
/// variant that came first.
pub fn select_best(
    candidates: Vec<LocalizedResult>,
    preferred_locale: Option<&str>,
    epsilon: f64,
) -> Option<LocalizedResult> {
    let mut best: Option<LocalizedResult> = None;

    for candidate in candidates {
        let score = candidate.result.score();
        let should_replace = match &best {
            None => true,
            Some(current) if score > current.result.score() + epsilon => true,
            Some(current)
                if (score - current.result.score()).abs() <= epsilon
                    && preferred_locale == Some(candidate.locale.as_str())
                    && preferred_locale != Some(current.locale.as_str()) =>
            {
                true
            }
            _ => false,
        };
        tracing::debug!(
            locale = candidate.locale.as_str(),
            score = format!("{score:.3}"),
            selected = should_replace,
            "locale: scored variant"
        );
        if should_replace {
            best = Some(candidate);
        }
    }

    best
}
