use crate::error::ScoringError;
use crate::types::{AlignmentPosition, AlignmentResult, PhonemeSequence};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, transcription: Option<&str>) -> PhonemeSequence;
}

pub trait SequenceAligner: Send + Sync {
    fn align(
        &self,
        reference: &[String],
        observed: &[String],
    ) -> Result<Vec<AlignmentPosition>, ScoringError>;

    fn name(&self) -> &'static str;
}

/// Identifies a cached result: the aligner that produced it and hashes of
/// the two token sequences it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub aligner: &'static str,
    pub observed_hash: u64,
    pub reference_hash: u64,
}

/// Caller-owned store for repeated scoring calls.
///
/// Keys are hashes, so a hit may belong to a different pair of sequences; the
/// scorer checks returned results against its inputs before using them.
pub trait ScoreCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<AlignmentResult>;

    fn insert(&self, key: CacheKey, result: AlignmentResult);
}
