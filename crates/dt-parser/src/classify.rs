use dt_core::{DocumentableShape, MethodKind};

use crate::kinds;
use crate::syntax::{find_node_at, SyntaxNode};

/// Upper bound on ancestor steps when resolving a cursor node.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// A node the engine can document.
#[derive(Debug, Clone, Copy)]
pub struct DocTarget<N> {
    /// The declaration itself (function, class, declarator, member, ...).
    pub node: N,
    pub shape: DocumentableShape,
    /// Outermost statement the comment belongs above: the `export`,
    /// `declare` or `const` statement wrapping `node`, or `node` itself.
    pub anchor: N,
}

/// Classify a node by its own kind and immediate context. Pure.
pub fn classify<'t, N: SyntaxNode<'t>>(node: N) -> DocumentableShape {
    let parent_kind = node.parent().map(|p| p.kind()).unwrap_or("");
    match node.kind() {
        k if kinds::is_function_declaration(k) => DocumentableShape::FunctionLike,
        k if kinds::is_class_declaration(k) => DocumentableShape::ClassLike,
        k if kinds::is_module_declaration(k) => DocumentableShape::ModuleLike,
        // `export default function () {}` and `export default class {}`.
        k if kinds::is_function_value(k) && parent_kind == "export_statement" => {
            DocumentableShape::FunctionLike
        }
        "class" if parent_kind == "export_statement" => DocumentableShape::ClassLike,
        "interface_declaration" => DocumentableShape::InterfaceLike,
        "enum_declaration" => DocumentableShape::EnumLike,
        "method_definition" | "method_signature" | "abstract_method_signature"
            if kinds::is_member_container(parent_kind) =>
        {
            DocumentableShape::MethodLike(method_kind(node))
        }
        "public_field_definition" => {
            let value = node.child_by_field("value");
            if value.is_some_and(|v| kinds::is_function_value(v.kind())) {
                DocumentableShape::MethodLike(MethodKind::Ordinary)
            } else {
                DocumentableShape::PropertyLike
            }
        }
        "property_signature" if is_interface_member(node) => DocumentableShape::PropertyLike,
        "enum_assignment" | "property_identifier" | "string" if parent_kind == "enum_body" => {
            DocumentableShape::EnumMember
        }
        "variable_declarator" => {
            let value = node.child_by_field("value");
            if value.is_some_and(|v| kinds::is_function_value(v.kind())) {
                DocumentableShape::VariableDeclarationWithFunctionInit
            } else {
                DocumentableShape::Unsupported
            }
        }
        _ => DocumentableShape::Unsupported,
    }
}

/// Property signatures document interface members, not inline object types.
fn is_interface_member<'t, N: SyntaxNode<'t>>(node: N) -> bool {
    match node.parent() {
        Some(body) if body.kind() == "interface_body" => true,
        Some(body) if body.kind() == "object_type" => body
            .parent()
            .is_some_and(|p| p.kind() == "interface_declaration"),
        _ => false,
    }
}

fn method_kind<'t, N: SyntaxNode<'t>>(node: N) -> MethodKind {
    if node.has_token("get") {
        MethodKind::Getter
    } else if node.has_token("set") {
        MethodKind::Setter
    } else if node
        .child_by_field("name")
        .is_some_and(|n| n.text() == "constructor")
    {
        MethodKind::Constructor
    } else {
        MethodKind::Ordinary
    }
}

/// Build a target for a node already known to be documentable.
pub fn target_for<'t, N: SyntaxNode<'t>>(node: N, shape: DocumentableShape) -> DocTarget<N> {
    DocTarget {
        node,
        shape,
        anchor: anchor_of(node),
    }
}

/// Classify `node` as a target, or `None` when it is not documentable.
pub fn as_target<'t, N: SyntaxNode<'t>>(node: N) -> Option<DocTarget<N>> {
    let shape = classify(node);
    shape.is_supported().then(|| target_for(node, shape))
}

/// The statement a comment for `node` sits above.
pub fn anchor_of<'t, N: SyntaxNode<'t>>(node: N) -> N {
    let mut anchor = node;
    if node.kind() == "variable_declarator" {
        if let Some(statement) = node
            .parent()
            .filter(|p| kinds::is_variable_statement(p.kind()))
        {
            anchor = statement;
        }
    }
    while let Some(parent) = anchor.parent() {
        match parent.kind() {
            "export_statement" | "ambient_declaration" => anchor = parent,
            "expression_statement" if parent.named_children().len() == 1 => anchor = parent,
            _ => break,
        }
    }
    anchor
}

/// Decorators written as siblings before a class member, in source order.
pub fn leading_decorators<'t, N: SyntaxNode<'t>>(node: N) -> Vec<N> {
    let mut found = Vec::new();
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev.filter(|s| s.kind() == "decorator") {
        found.push(sibling);
        prev = sibling.prev_sibling();
    }
    found.reverse();
    found
}

/// First node of the region a comment for `anchor` sits above: the earliest
/// sibling decorator, or the anchor itself.
pub fn attachment_start<'t, N: SyntaxNode<'t>>(anchor: N) -> N {
    leading_decorators(anchor).first().copied().unwrap_or(anchor)
}

/// Descend from a wrapper statement to the first documentable declaration it
/// wraps (`export function f`, `const f = () => {}`, `declare class C`).
fn unwrap_declaration<'t, N: SyntaxNode<'t>>(node: N) -> Option<DocTarget<N>> {
    if !kinds::is_wrapper_statement(node.kind()) {
        return None;
    }
    node.named_children()
        .into_iter()
        .filter(|c| !kinds::is_comment(c.kind()))
        .find_map(|child| as_target(child).or_else(|| unwrap_declaration(child)))
}

/// Resolve a cursor node to the nearest documentable node: the node itself,
/// the declaration it wraps, or its nearest documentable ancestor below the
/// program root. The walk is capped at [`MAX_ANCESTOR_DEPTH`] steps.
pub fn resolve<'t, N: SyntaxNode<'t>>(node: N) -> Option<DocTarget<N>> {
    let mut current = node;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if let Some(target) = as_target(current).or_else(|| unwrap_declaration(current)) {
            return Some(target);
        }
        match current.parent() {
            Some(parent) if parent.kind() != "program" => current = parent,
            _ => return None,
        }
    }
    tracing::debug!(start = ?node, "ancestor walk hit the depth cap");
    None
}

/// Resolve a cursor position to a target.
///
/// A cursor inside a comment points at the declaration following the comment;
/// a cursor in the leading whitespace of a line points at the declaration
/// starting on that line.
pub fn resolve_at<'t, N: SyntaxNode<'t>>(root: N, offset: usize, line: u32) -> Option<DocTarget<N>> {
    let node = find_node_at(root, offset);

    if kinds::is_comment(node.kind()) {
        let mut next = node.next_sibling();
        while let Some(sibling) = next {
            if sibling.is_named() && !kinds::is_comment(sibling.kind()) {
                return resolve(sibling);
            }
            next = sibling.next_sibling();
        }
        return None;
    }

    if kinds::is_block_container(node.kind()) {
        let on_line = node.named_children().into_iter().find(|c| {
            !kinds::is_comment(c.kind())
                && c.start_position().line == line
                && c.start_byte() >= offset
        })?;
        return resolve(on_line);
    }

    resolve(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ArenaBuilder, ArenaTree};

    /// `const f = (a) => a;` with the parts the classifier looks at.
    fn arrow_tree() -> ArenaTree {
        let mut b = ArenaBuilder::new("const f = (a) => a;");
        let stmt = b.node(ArenaBuilder::ROOT, "lexical_declaration", 0..19);
        let decl = b.node(stmt, "variable_declarator", 6..18);
        b.field(decl, "name", "identifier", 6..7);
        let arrow = b.field(decl, "value", "arrow_function", 10..18);
        let params = b.field(arrow, "parameters", "formal_parameters", 10..13);
        b.node(params, "identifier", 11..12);
        b.field(arrow, "body", "identifier", 17..18);
        b.build()
    }

    #[test]
    fn declarator_with_arrow_is_documentable() {
        let tree = arrow_tree();
        let stmt = tree.root().children()[0];
        let decl = stmt.named_children()[0];
        assert_eq!(
            classify(decl),
            DocumentableShape::VariableDeclarationWithFunctionInit
        );
        assert_eq!(anchor_of(decl).kind(), "lexical_declaration");
    }

    #[test]
    fn cursor_on_parameter_resolves_to_declarator() {
        let tree = arrow_tree();
        let param = find_node_at(tree.root(), 11);
        assert_eq!(param.kind(), "identifier");
        let target = resolve(param).unwrap();
        assert_eq!(target.node.kind(), "variable_declarator");
        assert_eq!(target.anchor.kind(), "lexical_declaration");
    }

    #[test]
    fn cursor_on_statement_unwraps_to_declarator() {
        let tree = arrow_tree();
        let stmt = tree.root().children()[0];
        let target = resolve(stmt).unwrap();
        assert_eq!(target.node.kind(), "variable_declarator");
    }

    #[test]
    fn plain_value_declarator_is_unsupported() {
        let mut b = ArenaBuilder::new("let x = 1;");
        let stmt = b.node(ArenaBuilder::ROOT, "lexical_declaration", 0..10);
        let decl = b.node(stmt, "variable_declarator", 4..9);
        b.field(decl, "name", "identifier", 4..5);
        b.field(decl, "value", "number", 8..9);
        let tree = b.build();
        let number = find_node_at(tree.root(), 8);
        assert_eq!(classify(number), DocumentableShape::Unsupported);
        assert!(resolve(number).is_none());
    }

    #[test]
    fn default_exported_function_value_is_a_function() {
        let mut b = ArenaBuilder::new("export default function () {}");
        let export = b.node(ArenaBuilder::ROOT, "export_statement", 0..29);
        let func = b.node(export, "function_expression", 15..29);
        b.field(func, "parameters", "formal_parameters", 24..26);
        let tree = b.build();
        let target = resolve(find_node_at(tree.root(), 25)).unwrap();
        assert_eq!(target.shape, DocumentableShape::FunctionLike);
        assert_eq!(target.anchor.kind(), "export_statement");
        assert_eq!(
            classify(tree.root().children()[0]),
            DocumentableShape::Unsupported
        );
    }

    #[test]
    fn accessor_tokens_decide_method_kind() {
        let mut b = ArenaBuilder::new("class A { get x() {} }");
        let class = b.node(ArenaBuilder::ROOT, "class_declaration", 0..22);
        let body = b.field(class, "body", "class_body", 8..22);
        let method = b.node(body, "method_definition", 10..20);
        b.token(method, "get", 10..13);
        b.field(method, "name", "property_identifier", 14..15);
        let tree = b.build();
        let node = find_node_at(tree.root(), 14);
        let target = resolve(node).unwrap();
        assert_eq!(target.shape, DocumentableShape::MethodLike(MethodKind::Getter));
    }

    #[test]
    fn deep_trees_stop_at_the_depth_cap() {
        let source = "x".repeat(MAX_ANCESTOR_DEPTH + 10);
        let mut b = ArenaBuilder::new(source.clone());
        let mut parent = b.node(ArenaBuilder::ROOT, "function_declaration", 0..source.len());
        for _ in 0..MAX_ANCESTOR_DEPTH + 5 {
            parent = b.node(parent, "parenthesized_expression", 0..source.len());
        }
        let tree = b.build();
        let leaf = find_node_at(tree.root(), 0);
        assert!(resolve(leaf).is_none());
    }

    #[test]
    fn whitespace_cursor_points_at_declaration_on_line() {
        let mut b = ArenaBuilder::new("  function f() {}");
        let func = b.node(ArenaBuilder::ROOT, "function_declaration", 2..17);
        b.field(func, "name", "identifier", 11..12);
        let tree = b.build();
        let target = resolve_at(tree.root(), 0, 0).unwrap();
        assert_eq!(target.shape, DocumentableShape::FunctionLike);
    }
}
