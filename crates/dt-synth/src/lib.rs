pub mod config;
pub mod engine;
pub mod error;
pub mod existing;
pub mod merge;
pub mod render;
pub mod report;
pub mod sweep;
pub mod trigger;

pub use config::{ReturnsPolicy, SynthConfig};
pub use dt_core::{apply_edits, EditOperation, Language, Position, Span};
pub use engine::{Documenter, NodeTrace, TracedTarget};
pub use error::SynthError;
pub use merge::{find_existing, merge_blocks, plan, shares_line, ExistingComment};
pub use render::{infer_type, render, MAX_DEFAULT_LEN};
pub use report::{SkipReason, SweepOutcome, SweepReport};
pub use sweep::sweep;
pub use trigger::{is_doc_comment_trigger, TextChange};
