//! Hand-built syntax trees.
//!
//! `ArenaTree` implements [`SyntaxNode`] without any parser, which lets the
//! classifier, extractor and merge engine run against minimal trees that spell
//! out exactly the nodes a test cares about. Hosts embedding a different parser
//! can also convert into it.

use std::fmt;
use std::ops::Range;

use dt_core::{LineIndex, Position};

use crate::syntax::{describe, SyntaxNode};

#[derive(Debug, Clone)]
struct ArenaData {
    kind: String,
    named: bool,
    field: Option<String>,
    range: Range<usize>,
    start: Position,
    end: Position,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// An immutable tree built by [`ArenaBuilder`].
#[derive(Debug, Clone)]
pub struct ArenaTree {
    source: String,
    nodes: Vec<ArenaData>,
}

impl ArenaTree {
    pub fn root(&self) -> ArenaNode<'_> {
        ArenaNode {
            tree: self,
            index: ArenaBuilder::ROOT,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds an [`ArenaTree`] over a source string. Node ranges are byte ranges
/// into that source; children are ordered by start offset on `build`.
#[derive(Debug)]
pub struct ArenaBuilder {
    source: String,
    nodes: Vec<ArenaData>,
}

impl ArenaBuilder {
    pub const ROOT: usize = 0;

    /// Start a tree whose root is a `program` node spanning all of `source`.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let root = ArenaData {
            kind: "program".to_string(),
            named: true,
            field: None,
            range: 0..source.len(),
            start: Position::default(),
            end: Position::default(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            source,
            nodes: vec![root],
        }
    }

    /// Byte range of the `nth` (0-based) occurrence of `needle` in the source.
    pub fn find(&self, needle: &str, nth: usize) -> Option<Range<usize>> {
        self.source
            .match_indices(needle)
            .nth(nth)
            .map(|(start, m)| start..start + m.len())
    }

    fn push(
        &mut self,
        parent: usize,
        kind: &str,
        named: bool,
        field: Option<&str>,
        range: Range<usize>,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(ArenaData {
            kind: kind.to_string(),
            named,
            field: field.map(str::to_string),
            range,
            start: Position::default(),
            end: Position::default(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    /// Add a named child.
    pub fn node(&mut self, parent: usize, kind: &str, range: Range<usize>) -> usize {
        self.push(parent, kind, true, None, range)
    }

    /// Add a named child reachable through `field`.
    pub fn field(&mut self, parent: usize, field: &str, kind: &str, range: Range<usize>) -> usize {
        self.push(parent, kind, true, Some(field), range)
    }

    /// Add an anonymous token child (`async`, `get`, `*`, ...).
    pub fn token(&mut self, parent: usize, kind: &str, range: Range<usize>) -> usize {
        self.push(parent, kind, false, None, range)
    }

    pub fn build(mut self) -> ArenaTree {
        let index = LineIndex::new(&self.source);
        let end_of_text = index.position_of(self.source.len()).unwrap_or_default();
        let starts: Vec<usize> = self.nodes.iter().map(|n| n.range.start).collect();
        for node in &mut self.nodes {
            node.start = index.position_of(node.range.start).unwrap_or(end_of_text);
            node.end = index.position_of(node.range.end).unwrap_or(end_of_text);
            node.children.sort_by_key(|&c| starts[c]);
        }
        ArenaTree {
            source: self.source,
            nodes: self.nodes,
        }
    }
}

/// Handle to one node of an [`ArenaTree`].
#[derive(Clone, Copy)]
pub struct ArenaNode<'t> {
    tree: &'t ArenaTree,
    index: usize,
}

impl<'t> ArenaNode<'t> {
    fn data(&self) -> &'t ArenaData {
        &self.tree.nodes[self.index]
    }

    fn at(&self, index: usize) -> Self {
        Self {
            tree: self.tree,
            index,
        }
    }
}

impl fmt::Debug for ArenaNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(*self))
    }
}

impl<'t> SyntaxNode<'t> for ArenaNode<'t> {
    fn kind(&self) -> &'t str {
        &self.data().kind
    }

    fn is_named(&self) -> bool {
        self.data().named
    }

    fn byte_range(&self) -> Range<usize> {
        self.data().range.clone()
    }

    fn start_position(&self) -> Position {
        self.data().start
    }

    fn end_position(&self) -> Position {
        self.data().end
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|p| self.at(p))
    }

    fn children(&self) -> Vec<Self> {
        self.data().children.iter().map(|&c| self.at(c)).collect()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.data()
            .children
            .iter()
            .find(|&&c| self.tree.nodes[c].field.as_deref() == Some(field))
            .map(|&c| self.at(c))
    }

    fn text(&self) -> &'t str {
        self.tree
            .source
            .get(self.data().range.clone())
            .unwrap_or("")
    }

    fn id(&self) -> usize {
        self.index
    }
}
