use std::fmt;

use thiserror::Error;

/// Which side of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSide {
    Reference,
    Observed,
}

impl fmt::Display for SequenceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Observed => f.write_str("observed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{side} sequence has {tokens} tokens, exceeding the maximum of {max}")]
    InputTooLarge {
        side: SequenceSide,
        tokens: usize,
        max: usize,
    },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid scorer config: {message}")]
    InvalidConfig { message: String },
}

impl ScoringError {
    pub(crate) fn input_too_large(side: SequenceSide, tokens: usize, max: usize) -> Self {
        Self::InputTooLarge { side, tokens, max }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for errors that reject a single request rather than the scorer setup.
    pub fn is_input_too_large(&self) -> bool {
        matches!(self, Self::InputTooLarge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_too_large_message_names_side() {
        let err = ScoringError::input_too_large(SequenceSide::Observed, 2001, 2000);
        assert_eq!(
            err.to_string(),
            "observed sequence has 2001 tokens, exceeding the maximum of 2000"
        );
        assert!(err.is_input_too_large());
    }

    #[test]
    fn invalid_config_is_not_input_error() {
        let err = ScoringError::invalid_config("max_tokens must be > 0");
        assert!(!err.is_input_too_large());
        assert_eq!(
            err.to_string(),
            "invalid scorer config: max_tokens must be > 0"
        );
    }
}
