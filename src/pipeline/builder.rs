use std::sync::Arc;

use crate::config::ScorerConfig;
use crate::error::ScoringError;
use crate::pipeline::defaults::{aligner_for, WhitespaceTokenizer};
use crate::pipeline::runtime::{PronunciationScorer, PronunciationScorerParts};
use crate::pipeline::traits::{ScoreCache, SequenceAligner, Tokenizer};

pub struct PronunciationScorerBuilder {
    config: ScorerConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    cache: Option<Arc<dyn ScoreCache>>,
}

impl PronunciationScorerBuilder {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            sequence_aligner: None,
            cache: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Overrides the aligner otherwise chosen by `config.strategy`.
    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ScoreCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<PronunciationScorer, ScoringError> {
        self.config.validate()?;
        let strategy = self.config.strategy;
        let max_tokens = self.config.max_tokens;

        Ok(PronunciationScorer::from_parts(PronunciationScorerParts {
            config: self.config,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WhitespaceTokenizer)),
            sequence_aligner: self
                .sequence_aligner
                .unwrap_or_else(|| aligner_for(strategy, max_tokens)),
            cache: self.cache,
        }))
    }
}
