/// Parser errors.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("unsupported language: {language_id}")]
    UnsupportedLanguage { language_id: String },

    #[error("source too large ({size} bytes, max {max})")]
    SourceTooLarge { size: u64, max: u64 },

    #[error("invalid encoding: source contains binary data")]
    InvalidEncoding,

    #[error("parse failed: {reason}")]
    ParseFailed { reason: String },
}

impl ParserError {
    pub fn is_retryable(&self) -> bool {
        false
    }
}
