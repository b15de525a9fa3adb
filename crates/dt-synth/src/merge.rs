use dt_core::{
    CommentBlock, DocumentableShape, EditOperation, LineIndex, Position, SignatureDescriptor, Span,
    TagKind, TagLine,
};
use dt_parser::{attachment_start, kinds, DocTarget, SyntaxNode};

use crate::error::SynthError;
use crate::existing::{is_doc_comment, is_file_header, parse_block};

/// The documentation comment directly above a target.
#[derive(Debug, Clone, Copy)]
pub struct ExistingComment<N> {
    pub node: N,
    /// From the start of the comment's line to the end of the comment.
    pub span: Span,
}

/// Find the `/** */` block belonging to `anchor`: the nearest preceding
/// sibling, separated from it only by whitespace, alone at the start of its
/// line, and not a file header.
pub fn find_existing<'t, N: SyntaxNode<'t>>(
    anchor: N,
    index: &LineIndex<'_>,
) -> Option<ExistingComment<N>> {
    let start = attachment_start(anchor);
    let comment = start.prev_sibling()?;
    if !kinds::is_comment(comment.kind()) || !is_doc_comment(comment.text()) {
        return None;
    }

    let source = index.text();
    let between = source.get(comment.byte_range().end..start.start_byte())?;
    if !between.trim().is_empty() {
        return None;
    }
    let line = comment.start_position().line;
    let line_start = index.line_start(line)?;
    let before = source.get(line_start..comment.start_byte())?;
    if !before.trim().is_empty() {
        return None;
    }
    if parse_block(comment.text()).is_ok_and(|b| is_file_header(&b)) {
        return None;
    }

    Some(ExistingComment {
        node: comment,
        span: Span::new(Position::line_start(line), comment.end_position()),
    })
}

/// Whether code precedes `anchor` on its first line. An attached
/// documentation block, even one ending on that line, does not count.
pub fn shares_line<'t, N: SyntaxNode<'t>>(anchor: N, index: &LineIndex<'_>) -> bool {
    if find_existing(anchor, index).is_some() {
        return false;
    }
    let start = attachment_start(anchor);
    let line_start = index.line_start(start.start_position().line).unwrap_or(0);
    index
        .text()
        .get(line_start..start.start_byte())
        .is_some_and(|leading| !leading.trim().is_empty())
}

/// Combine an existing block with a freshly rendered one.
///
/// Existing bodies win for tags that still apply (same kind and referent),
/// except named kind tags, which take the current name. Stale referent tags,
/// duplicate singletons, false flags, impossible `@returns` and a property
/// `@type` without an annotation are dropped; missing tags come from `fresh`;
/// description and unmanaged tags are kept verbatim. The result is stably
/// ordered by kind.
/// Compactness is taken from the existing block.
pub fn merge_blocks(
    existing: &CommentBlock,
    fresh: &CommentBlock,
    desc: &SignatureDescriptor,
) -> CommentBlock {
    let mut consumed = vec![false; existing.tags.len()];
    let mut tags: Vec<TagLine> = Vec::with_capacity(fresh.tags.len() + existing.tags.len());
    let has_description = existing.description.iter().any(|l| !l.is_empty());

    for tag in &fresh.tags {
        let kind = tag.kind();
        if kind == TagKind::Description && has_description {
            continue;
        }
        let referent = tag.referent();
        let matched = existing.tags.iter().enumerate().position(|(i, old)| {
            !consumed[i] && old.kind() == kind && old.referent() == referent
        });
        match matched {
            Some(i) => {
                consumed[i] = true;
                // `@class Name` and friends follow renames; `@enum {T}` keeps its type.
                if kind == TagKind::Kind && !tag.body.is_empty() {
                    tags.push(tag.clone());
                } else {
                    tags.push(existing.tags[i].clone());
                }
            }
            None => tags.push(tag.clone()),
        }

        // `@param opts.verbose` lines travel with their parent parameter.
        if let (TagKind::Param, Some(name)) = (kind, referent) {
            let prefix = format!("{name}.");
            for (i, old) in existing.tags.iter().enumerate() {
                if !consumed[i]
                    && old.kind() == TagKind::Param
                    && old.referent().is_some_and(|r| r.starts_with(&prefix))
                {
                    consumed[i] = true;
                    tags.push(old.clone());
                }
            }
        }
    }

    for (i, old) in existing.tags.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let kind = old.kind();
        let keep = match kind {
            TagKind::Param | TagKind::Template | TagKind::Extends | TagKind::Implements => false,
            TagKind::Abstract => desc.is_abstract,
            TagKind::Async => desc.is_async,
            TagKind::Generator => desc.is_generator,
            TagKind::Static => desc.is_static,
            TagKind::Returns => desc.can_return(),
            TagKind::Type => {
                !(desc.shape == DocumentableShape::PropertyLike && desc.value_type.is_none())
            }
            _ => true,
        };
        let duplicate = kind.is_singleton() && tags.iter().any(|t| t.kind() == kind);
        if keep && !duplicate {
            tags.push(old.clone());
        } else {
            tracing::debug!(tag = %old.tag, body = %old.body, "dropping stale tag");
        }
    }

    tags.sort_by_key(TagLine::kind);

    // An empty shell (`/**` + Enter) gets the fresh placeholder line.
    let description = if existing.description.is_empty() && existing.tags.is_empty() {
        fresh.description.clone()
    } else {
        existing.description.clone()
    };

    CommentBlock {
        indent: fresh.indent.clone(),
        description,
        tags,
        compact: existing.compact,
    }
}

/// Plan the edits that document `target` with `fresh`.
///
/// No existing block: insert above the anchor's first line. Existing block:
/// replace it with the merged block, or nothing when already up to date. A
/// malformed block is replaced by `fresh`.
pub fn plan<'t, N: SyntaxNode<'t>>(
    target: &DocTarget<N>,
    desc: &SignatureDescriptor,
    fresh: &CommentBlock,
    index: &LineIndex<'_>,
) -> Result<Vec<EditOperation>, SynthError> {
    let newline = index.newline();
    let line = attachment_start(target.anchor).start_position().line;

    let Some(existing) = find_existing(target.anchor, index) else {
        let text = format!("{}{newline}", fresh.format(newline));
        return Ok(vec![EditOperation::insert(Position::line_start(line), text)]);
    };

    let block = match parse_block(existing.node.text()) {
        Ok(parsed) => merge_blocks(&parsed, fresh, desc),
        Err(SynthError::MalformedExistingComment { reason }) => {
            tracing::debug!(%reason, at = %existing.span, "replacing malformed comment");
            fresh.clone()
        }
        Err(other) => return Err(other),
    };

    let text = block.format(newline);
    let start = index.offset_of(existing.span.start)?;
    let end = existing.node.byte_range().end;
    let current = index
        .text()
        .get(start..end)
        .ok_or_else(|| SynthError::internal("merge", format!("bad comment range {}", existing.span)))?;
    if current == text {
        return Ok(Vec::new());
    }
    Ok(vec![EditOperation::replace(existing.span, text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_core::ParameterDescriptor;

    fn block(description: &[&str], tags: &[(&str, &str)]) -> CommentBlock {
        let mut b = CommentBlock::new("");
        b.description = description.iter().map(|s| s.to_string()).collect();
        b.tags = tags.iter().map(|(t, body)| TagLine::new(*t, *body)).collect();
        b
    }

    fn function(params: &[&str]) -> SignatureDescriptor {
        let mut desc = SignatureDescriptor::new(DocumentableShape::FunctionLike);
        desc.parameters = params.iter().map(|p| ParameterDescriptor::named(*p)).collect();
        desc
    }

    #[test]
    fn keeps_existing_bodies_and_adds_new_params() {
        let existing = block(&["Adds."], &[("param", "a the first")]);
        let fresh = block(&[""], &[("param", "a"), ("param", "b")]);
        let merged = merge_blocks(&existing, &fresh, &function(&["a", "b"]));
        assert_eq!(merged.description, vec!["Adds."]);
        let bodies: Vec<_> = merged.tags.iter().map(|t| t.body.as_str()).collect();
        assert_eq!(bodies, vec!["a the first", "b"]);
    }

    #[test]
    fn stale_params_are_removed() {
        let existing = block(&[""], &[("param", "a"), ("param", "gone"), ("example", "f(1)")]);
        let fresh = block(&[""], &[("param", "a")]);
        let merged = merge_blocks(&existing, &fresh, &function(&["a"]));
        assert_eq!(merged.tag_names(), vec!["param", "example"]);
    }

    #[test]
    fn sub_params_follow_their_parent() {
        let existing = block(
            &[""],
            &[("param", "b"), ("param", "opts"), ("param", "opts.verbose")],
        );
        let fresh = block(&[""], &[("param", "opts"), ("param", "b")]);
        let merged = merge_blocks(&existing, &fresh, &function(&["opts", "b"]));
        let bodies: Vec<_> = merged.tags.iter().map(|t| t.body.as_str()).collect();
        assert_eq!(bodies, vec!["opts", "opts.verbose", "b"]);
    }

    #[test]
    fn flags_and_returns_follow_the_signature() {
        let existing = block(
            &[""],
            &[("async", ""), ("returns", "{number} sum"), ("returns", "dup")],
        );
        let fresh = block(&[""], &[]);
        let merged = merge_blocks(&existing, &fresh, &function(&[]));
        assert_eq!(merged.tag_names(), vec!["returns"]);
        assert_eq!(merged.tags[0].body, "{number} sum");

        let mut ctor = function(&[]);
        ctor.shape = DocumentableShape::MethodLike(dt_core::MethodKind::Constructor);
        let merged = merge_blocks(&existing, &fresh, &ctor);
        assert!(merged.tags.is_empty());
    }

    #[test]
    fn renamed_class_gets_its_new_name() {
        let existing = block(&["A store."], &[("class", "OldStore"), ("example", "new Store()")]);
        let fresh = block(&[""], &[("class", "Store")]);
        let desc = SignatureDescriptor::new(DocumentableShape::ClassLike);
        let merged = merge_blocks(&existing, &fresh, &desc);
        assert_eq!(merged.tags[0], TagLine::new("class", "Store"));
        assert_eq!(merged.tag_names(), vec!["class", "example"]);

        let existing = block(&[""], &[("enum", "{number}")]);
        let fresh = block(&[""], &[("enum", "")]);
        let desc = SignatureDescriptor::new(DocumentableShape::EnumLike);
        let merged = merge_blocks(&existing, &fresh, &desc);
        assert_eq!(merged.tags[0].body, "{number}");
    }

    #[test]
    fn type_tag_goes_with_its_annotation() {
        let existing = block(&["Label."], &[("type", "{string}")]);
        let fresh = block(&[""], &[]);
        let desc = SignatureDescriptor::new(DocumentableShape::PropertyLike);
        let merged = merge_blocks(&existing, &fresh, &desc);
        assert!(merged.tags.is_empty());
        assert_eq!(merged.description, vec!["Label."]);
    }

    #[test]
    fn user_tags_sort_after_managed_ones() {
        let existing = block(&[""], &[("example", "f()"), ("param", "a")]);
        let fresh = block(&[""], &[("param", "a"), ("returns", "")]);
        let merged = merge_blocks(&existing, &fresh, &function(&["a"]));
        assert_eq!(merged.tag_names(), vec!["param", "returns", "example"]);
    }

    #[test]
    fn description_tag_is_not_added_over_free_text() {
        let existing = block(&["Hand written."], &[]);
        let fresh = block(&[], &[("description", "")]);
        let merged = merge_blocks(&existing, &fresh, &function(&[]));
        assert!(merged.tags.is_empty());
        assert_eq!(merged.description, vec!["Hand written."]);
    }

    #[test]
    fn empty_shell_takes_the_placeholder() {
        let existing = block(&[], &[]);
        let fresh = block(&[""], &[("param", "a")]);
        let merged = merge_blocks(&existing, &fresh, &function(&["a"]));
        assert_eq!(merged.lines(), vec!["/**", " *", " * @param a", " */"]);
    }
}
