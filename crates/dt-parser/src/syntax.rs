use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use dt_core::{Language, Position};

use crate::error::ParserError;
use crate::file_check::{check_source_size, is_binary};
use crate::registry::ParserRegistry;

/// Read-only view of one node of a parsed source file.
///
/// Everything downstream of parsing (classification, extraction, merging,
/// sweeping) is written against this trait, so any tree that can answer these
/// questions can drive the engine. Nodes are cheap handles borrowing from the
/// tree for `'t`.
pub trait SyntaxNode<'t>: Copy + fmt::Debug {
    /// Grammar kind, e.g. `function_declaration` or `(`.
    fn kind(&self) -> &'t str;

    /// Named nodes are grammar rules; anonymous nodes are literal tokens.
    fn is_named(&self) -> bool;

    fn byte_range(&self) -> Range<usize>;

    fn start_position(&self) -> Position;

    fn end_position(&self) -> Position;

    fn parent(&self) -> Option<Self>;

    /// All children, named and anonymous, in source order.
    fn children(&self) -> Vec<Self>;

    fn child_by_field(&self, field: &str) -> Option<Self>;

    fn text(&self) -> &'t str;

    /// Identity within one tree.
    fn id(&self) -> usize;

    fn start_byte(&self) -> usize {
        self.byte_range().start
    }

    fn named_children(&self) -> Vec<Self> {
        self.children().into_iter().filter(|c| c.is_named()).collect()
    }

    /// Whether an anonymous token of this kind is a direct child.
    fn has_token(&self, token: &str) -> bool {
        self.children()
            .iter()
            .any(|c| !c.is_named() && c.kind() == token)
    }

    fn prev_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let pos = siblings.iter().position(|s| s.id() == self.id())?;
        pos.checked_sub(1).map(|i| siblings[i])
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let pos = siblings.iter().position(|s| s.id() == self.id())?;
        siblings.get(pos + 1).copied()
    }
}

/// Ancestors of `node`, nearest first, excluding the node itself.
pub fn ancestors<'t, N: SyntaxNode<'t>>(node: N) -> impl Iterator<Item = N> {
    std::iter::successors(node.parent(), |n| n.parent())
}

/// Deepest node whose range contains `offset`.
pub fn find_node_at<'t, N: SyntaxNode<'t>>(root: N, offset: usize) -> N {
    let mut current = root;
    'descend: loop {
        for child in current.children() {
            let range = child.byte_range();
            if range.start <= offset && offset < range.end {
                current = child;
                continue 'descend;
            }
        }
        return current;
    }
}

/// Pre-order (document order) traversal using an explicit stack.
pub fn preorder<'t, N: SyntaxNode<'t>>(root: N) -> Preorder<'t, N> {
    Preorder {
        stack: vec![root],
        _tree: PhantomData,
    }
}

pub struct Preorder<'t, N> {
    stack: Vec<N>,
    _tree: PhantomData<&'t ()>,
}

impl<'t, N: SyntaxNode<'t>> Iterator for Preorder<'t, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

/// Short `kind [start-end]` label used in traces and logs.
pub fn describe<'t, N: SyntaxNode<'t>>(node: N) -> String {
    format!(
        "{} [{}-{}]",
        node.kind(),
        node.start_position(),
        node.end_position()
    )
}

/// A tree-sitter node paired with the source it was parsed from.
#[derive(Clone, Copy)]
pub struct TsNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl fmt::Debug for TsNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(*self))
    }
}

fn point(p: tree_sitter::Point) -> Position {
    Position::new(p.row as u32, p.column as u32)
}

impl<'t> TsNode<'t> {
    fn wrap(&self, node: tree_sitter::Node<'t>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }
}

impl<'t> SyntaxNode<'t> for TsNode<'t> {
    fn kind(&self) -> &'t str {
        self.node.kind()
    }

    fn is_named(&self) -> bool {
        self.node.is_named()
    }

    fn byte_range(&self) -> Range<usize> {
        self.node.start_byte()..self.node.end_byte()
    }

    fn start_position(&self) -> Position {
        point(self.node.start_position())
    }

    fn end_position(&self) -> Position {
        point(self.node.end_position())
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|n| self.wrap(n))
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.node.child_by_field_name(field).map(|n| self.wrap(n))
    }

    fn text(&self) -> &'t str {
        self.node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn id(&self) -> usize {
        self.node.id()
    }

    fn prev_sibling(&self) -> Option<Self> {
        self.node.prev_sibling().map(|n| self.wrap(n))
    }

    fn next_sibling(&self) -> Option<Self> {
        self.node.next_sibling().map(|n| self.wrap(n))
    }
}

/// One parse of one source snapshot. Dropped at the end of every engine call;
/// nodes must not outlive it.
pub struct SyntaxTree<'s> {
    tree: tree_sitter::Tree,
    source: &'s str,
    language: Language,
}

impl<'s> SyntaxTree<'s> {
    pub fn root(&self) -> TsNode<'_> {
        TsNode {
            node: self.tree.root_node(),
            source: self.source,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Parse a JS-family source text.
pub fn parse_source(
    source: &str,
    language: Language,
    max_source_bytes: u64,
) -> Result<SyntaxTree<'_>, ParserError> {
    check_source_size(source.len() as u64, max_source_bytes)?;
    if is_binary(source.as_bytes()) {
        return Err(ParserError::InvalidEncoding);
    }

    let grammar = ParserRegistry::grammar_for(language);
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar)
        .map_err(|e| ParserError::ParseFailed {
            reason: format!("failed to set language: {e}"),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParserError::ParseFailed {
            reason: "tree-sitter returned no tree".to_string(),
        })?;

    if tree.root_node().has_error() {
        tracing::warn!(
            language = language.language_id(),
            "source has syntax errors; synthesis continues on the recovered tree"
        );
    }

    Ok(SyntaxTree {
        tree,
        source,
        language,
    })
}
