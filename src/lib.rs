pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::report::{
    aggregate_reports, compute_case_report, AggregateReport, CaseReport, Meta, Report,
};
pub use alignment::tokenization::tokenize_phonemes;
pub use config::{AlignmentStrategy, ScorerConfig};
pub use error::{ScoringError, SequenceSide};
pub use pipeline::builder::PronunciationScorerBuilder;
pub use pipeline::cache::MemoryScoreCache;
pub use pipeline::defaults::{EditDistanceAligner, PositionalAligner, WhitespaceTokenizer};
pub use pipeline::runtime::{score_pronunciation, PronunciationScorer};
pub use pipeline::traits::{CacheKey, ScoreCache, SequenceAligner, Tokenizer};
pub use types::{
    AlignmentPosition, AlignmentResult, AlignmentSummary, Classification, Correction,
    LocaleReference, LocalizedResult, PhonemeSequence,
};
