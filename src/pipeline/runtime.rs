use std::sync::Arc;

use crate::alignment::locale::select_best;
use crate::alignment::scoring::build_result;
use crate::config::ScorerConfig;
use crate::error::{ScoringError, SequenceSide};
use crate::pipeline::defaults::{aligner_for, WhitespaceTokenizer};
use crate::pipeline::traits::{CacheKey, ScoreCache, SequenceAligner, Tokenizer};
use crate::types::{AlignmentResult, LocaleReference, LocalizedResult, PhonemeSequence};

pub struct PronunciationScorer {
    config: ScorerConfig,
    tokenizer: Box<dyn Tokenizer>,
    sequence_aligner: Box<dyn SequenceAligner>,
    cache: Option<Arc<dyn ScoreCache>>,
}

pub(crate) struct PronunciationScorerParts {
    pub config: ScorerConfig,
    pub tokenizer: Box<dyn Tokenizer>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub cache: Option<Arc<dyn ScoreCache>>,
}

impl PronunciationScorer {
    pub(crate) fn from_parts(parts: PronunciationScorerParts) -> Self {
        Self {
            config: parts.config,
            tokenizer: parts.tokenizer,
            sequence_aligner: parts.sequence_aligner,
            cache: parts.cache,
        }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn aligner_name(&self) -> &'static str {
        self.sequence_aligner.name()
    }

    /// Score one attempt against one reference transcription.
    ///
    /// `None`, empty and whitespace-only strings are empty sequences, not
    /// errors. Fails only when a side exceeds `config.max_tokens`.
    pub fn score(
        &self,
        observed: Option<&str>,
        reference: Option<&str>,
    ) -> Result<AlignmentResult, ScoringError> {
        let observed = self.tokenizer.tokenize(observed);
        let reference = self.tokenizer.tokenize(reference);
        self.score_sequences(&observed, &reference)
    }

    pub fn score_sequences(
        &self,
        observed: &PhonemeSequence,
        reference: &PhonemeSequence,
    ) -> Result<AlignmentResult, ScoringError> {
        self.check_size(SequenceSide::Reference, reference)?;
        self.check_size(SequenceSide::Observed, observed)?;

        let key = self
            .cache
            .as_ref()
            .map(|_| CacheKey::for_sequences(self.sequence_aligner.name(), observed, reference));
        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key.as_ref()) {
            if let Some(cached) = cache.get(key) {
                if result_matches(&cached, observed, reference) {
                    tracing::debug!("scorer: cache hit");
                    return Ok(cached);
                }
                tracing::debug!("scorer: cache key collision, recomputing");
            }
        }

        let positions = self
            .sequence_aligner
            .align(reference.tokens(), observed.tokens())?;
        let result = build_result(positions);

        let summary = result.summary();
        tracing::debug!(
            aligner = self.sequence_aligner.name(),
            reference_len = reference.len(),
            observed_len = observed.len(),
            matches = summary.matches,
            substitutions = summary.substitutions,
            missing = summary.missing,
            extra = summary.extra,
            score = format!("{:.3}", result.score()),
            "scorer: aligned attempt"
        );

        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key) {
            cache.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Score the attempt against every locale variant that has a reference
    /// and return the best one, labelled with its locale.
    ///
    /// Returns `Ok(None)` when no variant has a reference. Any oversized
    /// variant rejects the whole request.
    pub fn score_locales(
        &self,
        observed: Option<&str>,
        variants: &[LocaleReference],
    ) -> Result<Option<LocalizedResult>, ScoringError> {
        let observed = self.tokenizer.tokenize(observed);

        let mut candidates = Vec::with_capacity(variants.len());
        for variant in variants {
            let Some(phonemes) = variant.phonemes.as_deref() else {
                continue;
            };
            let reference = self.tokenizer.tokenize(Some(phonemes));
            let result = self.score_sequences(&observed, &reference)?;
            candidates.push(LocalizedResult {
                locale: variant.locale.clone(),
                result,
            });
        }

        Ok(select_best(
            candidates,
            self.config.preferred_locale.as_deref(),
            self.config.tie_epsilon,
        ))
    }

    fn check_size(
        &self,
        side: SequenceSide,
        sequence: &PhonemeSequence,
    ) -> Result<(), ScoringError> {
        if sequence.len() > self.config.max_tokens {
            tracing::warn!(
                side = %side,
                tokens = sequence.len(),
                max_tokens = self.config.max_tokens,
                "scorer: rejecting oversized phoneme sequence"
            );
            return Err(ScoringError::input_too_large(
                side,
                sequence.len(),
                self.config.max_tokens,
            ));
        }
        Ok(())
    }
}

impl Default for PronunciationScorer {
    fn default() -> Self {
        let config = ScorerConfig::default();
        let sequence_aligner = aligner_for(config.strategy, config.max_tokens);
        Self::from_parts(PronunciationScorerParts {
            config,
            tokenizer: Box::new(WhitespaceTokenizer),
            sequence_aligner,
            cache: None,
        })
    }
}

fn result_matches(
    result: &AlignmentResult,
    observed: &PhonemeSequence,
    reference: &PhonemeSequence,
) -> bool {
    result.observed_tokens().iter().copied().eq(observed.tokens().iter().map(String::as_str))
        && result
            .reference_tokens()
            .iter()
            .copied()
            .eq(reference.tokens().iter().map(String::as_str))
}

/// Score with the default configuration: edit-distance alignment and a
/// 2000-token guard per side.
pub fn score_pronunciation(
    observed: Option<&str>,
    reference: Option<&str>,
) -> Result<AlignmentResult, ScoringError> {
    PronunciationScorer::default().score(observed, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlignmentStrategy;
    use crate::pipeline::builder::PronunciationScorerBuilder;
    use crate::types::{AlignmentPosition, Classification};

    fn scorer_with(config: ScorerConfig) -> PronunciationScorer {
        PronunciationScorerBuilder::new(config).build().unwrap()
    }

    #[test]
    fn scorer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PronunciationScorer>();
    }

    #[test]
    fn null_inputs_are_not_errors() {
        let result = score_pronunciation(None, None).unwrap();
        assert_eq!(result.score(), 1.0);
        assert!(result.positions().is_empty());

        let result = score_pronunciation(Some("k"), None).unwrap();
        assert_eq!(result.score(), 0.0);
        assert_eq!(result.positions(), [AlignmentPosition::extra("k")]);
    }

    #[test]
    fn guard_rejects_either_side() {
        let scorer = scorer_with(ScorerConfig {
            max_tokens: 3,
            ..ScorerConfig::default()
        });
        assert!(scorer.score(Some("a b c"), Some("a b c")).is_ok());

        let err = scorer.score(Some("a b c"), Some("a b c d")).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InputTooLarge {
                side: SequenceSide::Reference,
                tokens: 4,
                max: 3
            }
        ));

        let err = scorer.score(Some("a b c d"), Some("a")).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InputTooLarge {
                side: SequenceSide::Observed,
                ..
            }
        ));
    }

    #[test]
    fn oversized_input_does_not_touch_cache() {
        let cache = Arc::new(crate::pipeline::cache::MemoryScoreCache::default());
        let scorer = PronunciationScorerBuilder::new(ScorerConfig {
            max_tokens: 1,
            ..ScorerConfig::default()
        })
        .with_cache(cache.clone())
        .build()
        .unwrap();
        assert!(scorer.score(Some("a b"), Some("a")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_cache_keeps_strategies_apart() {
        let cache = Arc::new(crate::pipeline::cache::MemoryScoreCache::default());
        let edit_distance = PronunciationScorerBuilder::new(ScorerConfig::default())
            .with_cache(cache.clone())
            .build()
            .unwrap();
        let positional = PronunciationScorerBuilder::new(ScorerConfig {
            strategy: AlignmentStrategy::Positional,
            ..ScorerConfig::default()
        })
        .with_cache(cache.clone())
        .build()
        .unwrap();

        let first = edit_distance.score(Some("k æ p t"), Some("k æ t")).unwrap();
        assert_eq!(first.score(), 1.0);

        let second = positional.score(Some("k æ p t"), Some("k æ t")).unwrap();
        assert!((second.score() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            second.positions()[2].classification(),
            Classification::Substitution
        );
        assert_eq!(cache.len(), 2);

        let again = edit_distance.score(Some("k æ p t"), Some("k æ t")).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn tied_paths_report_forward_substitutions() {
        let result = score_pronunciation(Some("b c a b"), Some("a b a")).unwrap();
        let classes: Vec<_> = result
            .positions()
            .iter()
            .map(AlignmentPosition::classification)
            .collect();
        assert_eq!(
            classes,
            [
                Classification::Substitution,
                Classification::Substitution,
                Classification::Match,
                Classification::Extra,
            ]
        );
        assert!((result.score() - 1.0 / 3.0).abs() < 1e-12);
        let corrections: Vec<_> = result
            .corrections()
            .iter()
            .map(|c| (c.observed.as_str(), c.reference.as_str()))
            .collect();
        assert_eq!(corrections, [("b", "a"), ("c", "b")]);

        let result = score_pronunciation(Some("b c"), Some("a")).unwrap();
        assert_eq!(
            result.positions(),
            [AlignmentPosition::paired("a", "b"), AlignmentPosition::extra("c")]
        );
    }

    #[test]
    fn positional_strategy_is_selectable() {
        let scorer = scorer_with(ScorerConfig {
            strategy: AlignmentStrategy::Positional,
            ..ScorerConfig::default()
        });
        let result = scorer.score(Some("k æ p t"), Some("k æ t")).unwrap();
        assert_eq!(result.positions().len(), 4);
        assert_eq!(
            result.positions()[2].classification(),
            Classification::Substitution
        );
    }

    struct CollidingCache {
        stored: AlignmentResult,
    }

    impl ScoreCache for CollidingCache {
        fn get(&self, _key: &CacheKey) -> Option<AlignmentResult> {
            Some(self.stored.clone())
        }

        fn insert(&self, _key: CacheKey, _result: AlignmentResult) {}
    }

    #[test]
    fn colliding_cache_entry_is_ignored() {
        let stale = score_pronunciation(Some("s"), Some("s")).unwrap();
        let scorer = PronunciationScorerBuilder::new(ScorerConfig::default())
            .with_cache(Arc::new(CollidingCache { stored: stale }))
            .build()
            .unwrap();
        let result = scorer.score(Some("k ɛ t"), Some("k æ t")).unwrap();
        assert_eq!(result.reference_tokens(), ["k", "æ", "t"]);
        assert!((result.score() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn matching_cache_entry_is_returned() {
        let stored = score_pronunciation(Some("k ɛ t"), Some("k æ t")).unwrap();
        let scorer = PronunciationScorerBuilder::new(ScorerConfig::default())
            .with_cache(Arc::new(CollidingCache {
                stored: stored.clone(),
            }))
            .build()
            .unwrap();
        assert_eq!(scorer.score(Some("k ɛ t"), Some("k æ t")).unwrap(), stored);
    }

    #[test]
    fn score_locales_picks_best_and_labels_it() {
        let scorer = PronunciationScorer::default();
        let variants = [
            LocaleReference::new("en-us", Some("t ə m eɪ t oʊ")),
            LocaleReference::new("en-gb", Some("t ə m ɑː t əʊ")),
        ];
        let best = scorer
            .score_locales(Some("t ə m ɑː t əʊ"), &variants)
            .unwrap()
            .expect("a variant has a reference");
        assert_eq!(best.locale, "en-gb");
        assert_eq!(best.result.score(), 1.0);
    }

    #[test]
    fn score_locales_skips_null_variants() {
        let scorer = PronunciationScorer::default();
        let variants = [
            LocaleReference::new("en-us", None),
            LocaleReference::new("en-gb", Some("k æ t")),
        ];
        let best = scorer.score_locales(Some("k ɛ t"), &variants).unwrap().unwrap();
        assert_eq!(best.locale, "en-gb");

        let none = scorer
            .score_locales(Some("k æ t"), &[LocaleReference::new("en-us", None)])
            .unwrap();
        assert!(none.is_none());
        assert!(scorer.score_locales(Some("k æ t"), &[]).unwrap().is_none());
    }

    #[test]
    fn score_locales_respects_preferred_locale_on_tie() {
        let scorer = scorer_with(ScorerConfig {
            preferred_locale: Some("en-gb".to_string()),
            ..ScorerConfig::default()
        });
        let variants = [
            LocaleReference::new("en-us", Some("k æ t")),
            LocaleReference::new("en-gb", Some("k æ t")),
        ];
        let best = scorer.score_locales(Some("k æ t"), &variants).unwrap().unwrap();
        assert_eq!(best.locale, "en-gb");
    }

    #[test]
    fn score_locales_rejects_oversized_variant() {
        let scorer = scorer_with(ScorerConfig {
            max_tokens: 2,
            ..ScorerConfig::default()
        });
        let variants = [
            LocaleReference::new("en-us", Some("a b")),
            LocaleReference::new("en-gb", Some("a b c")),
        ];
        let err = scorer.score_locales(Some("a b"), &variants).unwrap_err();
        assert!(err.is_input_too_large());
    }
}
