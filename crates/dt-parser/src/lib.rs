pub mod arena;
pub mod classify;
pub mod error;
pub mod extract;
pub mod kinds;
pub mod syntax;
mod file_check;
mod registry;

pub use classify::{
    anchor_of, as_target, attachment_start, classify, leading_decorators, resolve, resolve_at,
    target_for, DocTarget, MAX_ANCESTOR_DEPTH,
};
pub use error::ParserError;
pub use extract::{display_name, extract};
pub use file_check::{check_source_size, is_binary, DEFAULT_MAX_SOURCE_BYTES};
pub use registry::ParserRegistry;
pub use syntax::{
    ancestors, describe, find_node_at, parse_source, preorder, SyntaxNode, SyntaxTree, TsNode,
};
