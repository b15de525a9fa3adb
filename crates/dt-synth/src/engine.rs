use std::fmt;

use serde::Serialize;

use dt_core::{
    DocumentableShape, EditOperation, Language, LineIndex, Position, SignatureDescriptor, Span,
};
use dt_parser::{
    ancestors, attachment_start, classify, describe, display_name, extract, find_node_at,
    parse_source, resolve_at, DocTarget, ParserRegistry, SyntaxNode,
};

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::merge::{plan, shares_line};
use crate::render::render;
use crate::report::SweepOutcome;
use crate::sweep::sweep;
use crate::trigger::{is_doc_comment_trigger, opener_position, TextChange};

/// The synthesis engine. Stateless apart from its settings: every call
/// parses the given source, runs to completion and drops the tree.
#[derive(Debug, Clone, Default)]
pub struct Documenter {
    config: SynthConfig,
}

impl Documenter {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Resolve an editor language id, rejecting non-JS-family documents.
    pub fn language_for_id(language_id: &str) -> Result<Language, SynthError> {
        ParserRegistry::language_for_id(language_id).ok_or_else(|| {
            SynthError::UnsupportedLanguage {
                language_id: language_id.to_string(),
            }
        })
    }

    /// Document the construct at `cursor`.
    ///
    /// Returns `UnsupportedConstruct` when nothing documentable encloses the
    /// cursor or the target starts after other code on its line, and an empty
    /// batch when the existing block is already current.
    #[tracing::instrument(skip(self, source, language), fields(language = language.language_id()))]
    pub fn document_this(
        &self,
        source: &str,
        language: Language,
        cursor: Position,
    ) -> Result<Vec<EditOperation>, SynthError> {
        let tree = parse_source(source, language, self.config.max_source_bytes)?;
        let index = LineIndex::new(source);
        let offset = index.offset_of(cursor)?;
        let target = resolve_at(tree.root(), offset, cursor.line)
            .ok_or(SynthError::UnsupportedConstruct { position: cursor })?;
        tracing::debug!(node = ?target.node, shape = %target.shape, "resolved target");
        // A block inserted above would land on the earlier code instead.
        if shares_line(target.anchor, &index) {
            tracing::debug!(node = ?target.node, "target shares its line with other code");
            return Err(SynthError::UnsupportedConstruct { position: cursor });
        }
        self.document_target(&target, &index)
    }

    /// Document every eligible construct, optionally only those starting
    /// within `bounds`. Produces one batch; any failure aborts it.
    #[tracing::instrument(skip(self, source, language), fields(language = language.language_id()))]
    pub fn document_everything(
        &self,
        source: &str,
        language: Language,
        bounds: Option<Span>,
        overwrite_existing: bool,
    ) -> Result<SweepOutcome, SynthError> {
        let tree = parse_source(source, language, self.config.max_source_bytes)?;
        let index = LineIndex::new(source);
        let outcome = sweep(tree.root(), &index, bounds, overwrite_existing, &self.config)?;
        tracing::info!(
            visited = outcome.report.visited,
            documented = outcome.report.documented,
            up_to_date = outcome.report.up_to_date,
            skipped = outcome.report.total_skipped(),
            edits = outcome.edits.len(),
            "sweep finished"
        );
        Ok(outcome)
    }

    /// Run `document_this` when `change` is a newline typed after `/**`.
    pub fn on_text_change(
        &self,
        source: &str,
        language: Language,
        change: &TextChange,
    ) -> Result<Option<Vec<EditOperation>>, SynthError> {
        if !is_doc_comment_trigger(source, change) {
            return Ok(None);
        }
        self.document_this(source, language, opener_position(change))
            .map(Some)
    }

    /// Describe how the cursor resolves, for debugging.
    #[tracing::instrument(skip(self, source, language), fields(language = language.language_id()))]
    pub fn trace_node(
        &self,
        source: &str,
        language: Language,
        cursor: Position,
    ) -> Result<NodeTrace, SynthError> {
        let tree = parse_source(source, language, self.config.max_source_bytes)?;
        let index = LineIndex::new(source);
        let offset = index.offset_of(cursor)?;
        let node = find_node_at(tree.root(), offset);

        let target = resolve_at(tree.root(), offset, cursor.line).map(|t| {
            let descriptor = extract(t.node, t.shape);
            TracedTarget {
                node: describe(t.node),
                shape: t.shape,
                anchor: describe(t.anchor),
                name: display_name(t.node).map(str::to_string),
                descriptor,
            }
        });

        Ok(NodeTrace {
            cursor,
            language,
            node: describe(node),
            shape: classify(node),
            ancestors: ancestors(node).map(describe).collect(),
            target,
            has_errors: tree.has_errors(),
        })
    }

    fn document_target<'t, N: SyntaxNode<'t>>(
        &self,
        target: &DocTarget<N>,
        index: &LineIndex<'_>,
    ) -> Result<Vec<EditOperation>, SynthError> {
        let desc = extract(target.node, target.shape);
        let line = attachment_start(target.anchor).start_position().line;
        let block = render(
            &desc,
            display_name(target.node),
            index.indentation(line),
            &self.config,
        );
        plan(target, &desc, &block, index)
    }
}

/// The target a traced cursor resolves to.
#[derive(Debug, Clone, Serialize)]
pub struct TracedTarget {
    pub node: String,
    pub shape: DocumentableShape,
    pub anchor: String,
    pub name: Option<String>,
    pub descriptor: SignatureDescriptor,
}

/// Debug dump of one cursor resolution.
#[derive(Debug, Clone, Serialize)]
pub struct NodeTrace {
    pub cursor: Position,
    pub language: Language,
    /// Deepest node at the cursor.
    pub node: String,
    /// Classification of that node alone.
    pub shape: DocumentableShape,
    /// Nearest first.
    pub ancestors: Vec<String>,
    pub target: Option<TracedTarget>,
    pub has_errors: bool,
}

impl fmt::Display for NodeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cursor   {} ({})", self.cursor, self.language.language_id())?;
        writeln!(f, "node     {} -> {}", self.node, self.shape)?;
        for ancestor in &self.ancestors {
            writeln!(f, "  in     {ancestor}")?;
        }
        match &self.target {
            Some(target) => {
                writeln!(
                    f,
                    "target   {} -> {} ({})",
                    target.node,
                    target.shape,
                    target.name.as_deref().unwrap_or("<anonymous>")
                )?;
                writeln!(f, "anchor   {}", target.anchor)?;
                let params: Vec<&str> = target
                    .descriptor
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                writeln!(f, "params   [{}]", params.join(", "))?;
                if let Some(ret) = &target.descriptor.return_type {
                    writeln!(f, "returns  {ret}")?;
                }
                if !target.descriptor.decorators.is_empty() {
                    writeln!(f, "decorated {}", target.descriptor.decorators.join(", "))?;
                }
            }
            None => writeln!(f, "target   <none>")?,
        }
        if self.has_errors {
            writeln!(f, "warning  source has syntax errors")?;
        }
        Ok(())
    }
}
