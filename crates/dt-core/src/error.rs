use crate::position::Position;

/// Errors from dt-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("position {line}:{column} is outside the source text")]
    InvalidPosition { line: u32, column: u32 },

    #[error("byte offset {offset} is outside the source text (len {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("edits overlap at {first} and {second}")]
    OverlappingEdits { first: Position, second: Position },
}

impl CoreError {
    pub fn is_retryable(&self) -> bool {
        false
    }
}
