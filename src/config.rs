use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Which alignment the scorer builds when no aligner is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentStrategy {
    #[default]
    EditDistance,
    Positional,
}

impl AlignmentStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditDistance => "edit-distance",
            Self::Positional => "positional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Upper bound on tokens per side; longer input is rejected before alignment.
    pub max_tokens: usize,
    pub strategy: AlignmentStrategy,
    /// Locale that wins when variant scores tie within `tie_epsilon`.
    pub preferred_locale: Option<String>,
    pub tie_epsilon: f64,
}

impl ScorerConfig {
    pub const DEFAULT_MAX_TOKENS: usize = 2_000;
    pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::io("read scorer config", e))?;
        serde_json::from_str(&data).map_err(|e| ScoringError::json("parse scorer config", e))
    }

    pub(crate) fn validate(&self) -> Result<(), ScoringError> {
        if self.max_tokens == 0 {
            return Err(ScoringError::invalid_config("max_tokens must be > 0"));
        }
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ScoringError::invalid_config(format!(
                "tie_epsilon must be a finite non-negative number, got {}",
                self.tie_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            strategy: AlignmentStrategy::default(),
            preferred_locale: None,
            tie_epsilon: Self::DEFAULT_TIE_EPSILON,
        }
    }
}
