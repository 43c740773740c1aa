use crate::alignment::edit_distance::align_edit_distance;
use crate::alignment::positional::align_positional;
use crate::alignment::tokenization::tokenize_phonemes;
use crate::config::{AlignmentStrategy, ScorerConfig};
use crate::error::{ScoringError, SequenceSide};
use crate::pipeline::traits::{SequenceAligner, Tokenizer};
use crate::types::{AlignmentPosition, PhonemeSequence};

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, transcription: Option<&str>) -> PhonemeSequence {
        tokenize_phonemes(transcription)
    }
}

/// Quadratic in time and memory, so it carries its own token limit and
/// refuses larger input before building the cost table.
pub struct EditDistanceAligner {
    max_tokens: usize,
}

impl EditDistanceAligner {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

impl Default for EditDistanceAligner {
    fn default() -> Self {
        Self::new(ScorerConfig::DEFAULT_MAX_TOKENS)
    }
}

impl SequenceAligner for EditDistanceAligner {
    fn align(
        &self,
        reference: &[String],
        observed: &[String],
    ) -> Result<Vec<AlignmentPosition>, ScoringError> {
        if reference.len() > self.max_tokens {
            return Err(ScoringError::input_too_large(
                SequenceSide::Reference,
                reference.len(),
                self.max_tokens,
            ));
        }
        if observed.len() > self.max_tokens {
            return Err(ScoringError::input_too_large(
                SequenceSide::Observed,
                observed.len(),
                self.max_tokens,
            ));
        }
        Ok(align_edit_distance(reference, observed))
    }

    fn name(&self) -> &'static str {
        AlignmentStrategy::EditDistance.as_str()
    }
}

pub struct PositionalAligner;

impl SequenceAligner for PositionalAligner {
    fn align(
        &self,
        reference: &[String],
        observed: &[String],
    ) -> Result<Vec<AlignmentPosition>, ScoringError> {
        Ok(align_positional(reference, observed))
    }

    fn name(&self) -> &'static str {
        AlignmentStrategy::Positional.as_str()
    }
}

pub(crate) fn aligner_for(strategy: AlignmentStrategy, max_tokens: usize) -> Box<dyn SequenceAligner> {
    match strategy {
        AlignmentStrategy::EditDistance => Box::new(EditDistanceAligner::new(max_tokens)),
        AlignmentStrategy::Positional => Box::new(PositionalAligner),
    }
}
