use std::fmt;

use serde::Serialize;

/// Whitespace-delimited phoneme tokens, in order. Never contains empty tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PhonemeSequence {
    tokens: Vec<String>,
}

impl PhonemeSequence {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Match,
    Substitution,
    /// Reference phoneme the learner left out.
    Missing,
    /// Phoneme the learner added.
    Extra,
}

impl Classification {
    /// `None` when neither side has a token.
    pub fn of(reference: Option<&str>, observed: Option<&str>) -> Option<Self> {
        match (reference, observed) {
            (Some(r), Some(o)) if r == o => Some(Self::Match),
            (Some(_), Some(_)) => Some(Self::Substitution),
            (Some(_), None) => Some(Self::Missing),
            (None, Some(_)) => Some(Self::Extra),
            (None, None) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Substitution => "substitution",
            Self::Missing => "missing",
            Self::Extra => "extra",
        }
    }
}

/// One slot of an alignment. The classification is always derived from the
/// tokens, so the pairing rules cannot be violated by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentPosition {
    reference_token: Option<String>,
    observed_token: Option<String>,
    classification: Classification,
}

impl AlignmentPosition {
    pub fn from_slots(reference: Option<String>, observed: Option<String>) -> Option<Self> {
        let classification = Classification::of(reference.as_deref(), observed.as_deref())?;
        Some(Self {
            reference_token: reference,
            observed_token: observed,
            classification,
        })
    }

    /// Both sides present: Match or Substitution.
    pub fn paired(reference: impl Into<String>, observed: impl Into<String>) -> Self {
        let reference = reference.into();
        let observed = observed.into();
        let classification = if reference == observed {
            Classification::Match
        } else {
            Classification::Substitution
        };
        Self {
            reference_token: Some(reference),
            observed_token: Some(observed),
            classification,
        }
    }

    pub fn missing(reference: impl Into<String>) -> Self {
        Self {
            reference_token: Some(reference.into()),
            observed_token: None,
            classification: Classification::Missing,
        }
    }

    pub fn extra(observed: impl Into<String>) -> Self {
        Self {
            reference_token: None,
            observed_token: Some(observed.into()),
            classification: Classification::Extra,
        }
    }

    pub fn reference_token(&self) -> Option<&str> {
        self.reference_token.as_deref()
    }

    pub fn observed_token(&self) -> Option<&str> {
        self.observed_token.as_deref()
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }
}

/// A confusable pair: what the learner said and what was expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Correction {
    pub observed: String,
    pub reference: String,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.observed, self.reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AlignmentSummary {
    pub matches: usize,
    pub substitutions: usize,
    pub missing: usize,
    pub extra: usize,
}

impl AlignmentSummary {
    pub fn edit_distance(&self) -> usize {
        self.substitutions + self.missing + self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    positions: Vec<AlignmentPosition>,
    /// Fraction of reference phonemes produced correctly, in [0, 1].
    score: f64,
    corrections: Vec<Correction>,
}

impl AlignmentResult {
    pub(crate) fn new(
        positions: Vec<AlignmentPosition>,
        score: f64,
        corrections: Vec<Correction>,
    ) -> Self {
        Self {
            positions,
            score,
            corrections,
        }
    }

    pub fn positions(&self) -> &[AlignmentPosition] {
        &self.positions
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    pub fn summary(&self) -> AlignmentSummary {
        let mut summary = AlignmentSummary::default();
        for position in &self.positions {
            match position.classification {
                Classification::Match => summary.matches += 1,
                Classification::Substitution => summary.substitutions += 1,
                Classification::Missing => summary.missing += 1,
                Classification::Extra => summary.extra += 1,
            }
        }
        summary
    }

    pub fn reference_tokens(&self) -> Vec<&str> {
        self.positions
            .iter()
            .filter_map(AlignmentPosition::reference_token)
            .collect()
    }

    pub fn observed_tokens(&self) -> Vec<&str> {
        self.positions
            .iter()
            .filter_map(AlignmentPosition::observed_token)
            .collect()
    }
}

/// One locale variant of a question's reference transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReference {
    pub locale: String,
    /// `None` excludes the variant from comparison.
    pub phonemes: Option<String>,
}

impl LocaleReference {
    pub fn new(locale: impl Into<String>, phonemes: Option<&str>) -> Self {
        Self {
            locale: locale.into(),
            phonemes: phonemes.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedResult {
    pub locale: String,
    #[serde(flatten)]
    pub result: AlignmentResult,
}
