mod comment;
mod edit;
mod error;
mod language;
mod position;
mod shape;
mod signature;

pub use comment::{CommentBlock, TagKind, TagLine};
pub use edit::{apply_edits, EditOperation};
pub use error::CoreError;
pub use language::Language;
pub use position::{LineIndex, Position, Span};
pub use shape::{DocumentableShape, MethodKind};
pub use signature::{ParameterDescriptor, SignatureDescriptor};
