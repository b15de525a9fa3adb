use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::position::{LineIndex, Position, Span};

/// One text change against the original source snapshot.
///
/// Positions always refer to the text as it was before any edit in the same
/// batch was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditOperation {
    Insert { at: Position, text: String },
    Replace { span: Span, text: String },
}

impl EditOperation {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::Insert {
            at,
            text: text.into(),
        }
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self::Replace {
            span,
            text: text.into(),
        }
    }

    /// The affected range; empty for insertions.
    pub fn span(&self) -> Span {
        match self {
            Self::Insert { at, .. } => Span::new(*at, *at),
            Self::Replace { span, .. } => *span,
        }
    }

    pub fn start(&self) -> Position {
        self.span().start
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Replace { text, .. } => text,
        }
    }
}

/// Apply a batch of edits to `source` in one pass.
///
/// Edits are resolved against the original text, so their order in the batch
/// only matters for insertions sharing a position (earlier edits land first).
/// Overlapping replacements are rejected and nothing is applied.
pub fn apply_edits(source: &str, edits: &[EditOperation]) -> Result<String, CoreError> {
    let index = LineIndex::new(source);
    let mut resolved = Vec::with_capacity(edits.len());
    for edit in edits {
        let span = edit.span();
        let start = index.offset_of(span.start)?;
        let end = index.offset_of(span.end)?;
        if end < start {
            return Err(CoreError::InvalidPosition {
                line: span.end.line,
                column: span.end.column,
            });
        }
        resolved.push((start, end, edit));
    }
    resolved.sort_by_key(|(start, _, _)| *start);

    for pair in resolved.windows(2) {
        let (_, prev_end, prev) = pair[0];
        let (next_start, _, next) = pair[1];
        if prev_end > next_start {
            return Err(CoreError::OverlappingEdits {
                first: prev.start(),
                second: next.start(),
            });
        }
    }

    let added: usize = edits.iter().map(|e| e.text().len()).sum();
    let mut out = String::with_capacity(source.len() + added);
    let mut cursor = 0;
    for (start, end, edit) in resolved {
        out.push_str(&source[cursor..start]);
        out.push_str(edit.text());
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}
