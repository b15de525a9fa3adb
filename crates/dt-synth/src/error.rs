use dt_core::{CoreError, Position};
use dt_parser::ParserError;

/// Synthesis errors.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("unsupported language: {language_id}")]
    UnsupportedLanguage { language_id: String },

    #[error("nothing to document at {position}")]
    UnsupportedConstruct { position: Position },

    #[error("malformed documentation comment: {reason}")]
    MalformedExistingComment { reason: String },

    #[error("synthesis failed at stage '{stage}': {reason}")]
    Internal { stage: String, reason: String },

    #[error("parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("edit error: {0}")]
    Core(#[from] CoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl SynthError {
    /// Expected no-op outcomes: hosts show a notice, not an error report.
    pub fn is_silent(&self) -> bool {
        match self {
            Self::UnsupportedLanguage { .. } | Self::UnsupportedConstruct { .. } => true,
            Self::Parser(ParserError::UnsupportedLanguage { .. }) => true,
            _ => false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Parser(e) => e.is_retryable(),
            Self::Core(e) => e.is_retryable(),
            _ => false,
        }
    }

    pub(crate) fn internal(stage: &str, reason: impl Into<String>) -> Self {
        Self::Internal {
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }
}
