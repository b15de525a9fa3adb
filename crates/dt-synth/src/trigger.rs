use serde::{Deserialize, Serialize};

use dt_core::{LineIndex, Position, Span};

/// One content change reported by an editor: `range` in the pre-change
/// document was replaced by `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub range: Span,
    pub text: String,
}

impl TextChange {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            range: Span::new(at, at),
            text: text.into(),
        }
    }
}

const OPENER: &str = "/**";

/// Whether `change` is a newline typed right after `/**`.
///
/// `source` is the document after the change; the three bytes before the
/// change end on the change's first line must be the opener.
pub fn is_doc_comment_trigger(source: &str, change: &TextChange) -> bool {
    if !(change.text.starts_with('\n') || change.text.starts_with("\r\n")) {
        return false;
    }
    let end = change.range.end.column as usize;
    if end < OPENER.len() {
        return false;
    }
    LineIndex::new(source)
        .line_text(change.range.start.line)
        .and_then(|line| line.get(end - OPENER.len()..end))
        == Some(OPENER)
}

/// Position of the `/**` that fired the trigger.
pub fn opener_position(change: &TextChange) -> Position {
    Position::new(
        change.range.start.line,
        change.range.end.column.saturating_sub(OPENER.len() as u32),
    )
}
