use std::collections::HashSet;

use dt_core::{DocumentableShape, ParameterDescriptor, SignatureDescriptor};

use crate::classify::leading_decorators;
use crate::kinds;
use crate::syntax::{ancestors, SyntaxNode};

/// Base name for destructured parameters; later patterns get `args1`, `args2`, ...
pub const PATTERN_PARAM_BASE: &str = "args";

/// Pull the signature facts for `node`, already classified as `shape`.
///
/// Purely syntactic: types come only from explicit annotations.
pub fn extract<'t, N: SyntaxNode<'t>>(node: N, shape: DocumentableShape) -> SignatureDescriptor {
    let mut desc = SignatureDescriptor::new(shape);

    match shape {
        DocumentableShape::FunctionLike
        | DocumentableShape::MethodLike(_)
        | DocumentableShape::VariableDeclarationWithFunctionInit => {
            let func = function_node(node);
            desc.parameters = parameters(func);
            desc.return_type = func
                .child_by_field("return_type")
                .and_then(annotation_text);
            desc.type_parameters = type_parameters(func);
            desc.is_async = func.has_token("async");
            desc.is_generator = func.kind().contains("generator") || func.has_token("*");
            desc.throws = thrown_types(func);
        }
        DocumentableShape::PropertyLike => {
            desc.value_type = node.child_by_field("type").and_then(annotation_text);
        }
        DocumentableShape::ClassLike => {
            desc.type_parameters = type_parameters(node);
            class_heritage(node, &mut desc);
        }
        DocumentableShape::InterfaceLike => {
            desc.type_parameters = type_parameters(node);
            desc.extends = interface_heritage(node);
        }
        DocumentableShape::EnumLike
        | DocumentableShape::EnumMember
        | DocumentableShape::ModuleLike
        | DocumentableShape::Unsupported => {}
    }

    desc.is_static = node.has_token("static");
    desc.is_abstract = node.kind() == "abstract_method_signature"
        || node.kind() == "abstract_class_declaration"
        || node.has_token("abstract");
    desc.decorators = decorators(node);
    if matches!(
        shape,
        DocumentableShape::MethodLike(_)
            | DocumentableShape::PropertyLike
            | DocumentableShape::EnumMember
    ) {
        desc.member_of = container_name(node);
    }
    desc
}

/// Name shown for a documentable node, if it has one. Declarators lend their
/// name to the anonymous function they hold.
pub fn display_name<'t, N: SyntaxNode<'t>>(node: N) -> Option<&'t str> {
    if matches!(node.kind(), "property_identifier" | "string") {
        return Some(node.text());
    }
    node.child_by_field("name").map(|n| n.text())
}

/// The node carrying parameters and body: the initializer of a declarator or
/// class field, otherwise the node itself.
fn function_node<'t, N: SyntaxNode<'t>>(node: N) -> N {
    match node.kind() {
        "variable_declarator" | "public_field_definition" => node
            .child_by_field("value")
            .filter(|v| kinds::is_function_value(v.kind()))
            .unwrap_or(node),
        _ => node,
    }
}

/// Whitespace-collapsed source text.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the type inside an annotation (`: T` -> `T`).
fn annotation_text<'t, N: SyntaxNode<'t>>(annotation: N) -> Option<String> {
    match annotation.kind() {
        "type_predicate_annotation" => Some("boolean".to_string()),
        "asserts_annotation" => None,
        kind if kinds::is_type_annotation(kind) => annotation
            .named_children()
            .into_iter()
            .find(|c| !kinds::is_comment(c.kind()))
            .map(|t| collapse(t.text())),
        _ => Some(collapse(annotation.text())),
    }
}

enum ParamName {
    Known(String),
    Pattern,
}

struct RawParam {
    name: ParamName,
    type_text: Option<String>,
    is_optional: bool,
    default_value: Option<String>,
    is_rest: bool,
}

impl RawParam {
    fn new(name: ParamName) -> Self {
        Self {
            name,
            type_text: None,
            is_optional: false,
            default_value: None,
            is_rest: false,
        }
    }
}

fn pattern_name<'t, N: SyntaxNode<'t>>(pattern: N) -> ParamName {
    if kinds::is_destructuring_pattern(pattern.kind()) {
        ParamName::Pattern
    } else {
        ParamName::Known(pattern.text().to_string())
    }
}

/// Read one formal parameter; `None` for things that are not parameters
/// (comments, decorators, TS `this` parameters).
fn raw_param<'t, N: SyntaxNode<'t>>(param: N) -> Option<RawParam> {
    match param.kind() {
        "required_parameter" | "optional_parameter" => {
            let pattern = param.child_by_field("pattern")?;
            if matches!(pattern.kind(), "this") || pattern.text() == "this" {
                return None;
            }
            let mut raw = if pattern.kind() == "rest_pattern" {
                rest_param(pattern)
            } else {
                RawParam::new(pattern_name(pattern))
            };
            raw.type_text = param.child_by_field("type").and_then(annotation_text);
            raw.is_optional = param.kind() == "optional_parameter";
            raw.default_value = param.child_by_field("value").map(|v| collapse(v.text()));
            Some(raw)
        }
        "identifier" => Some(RawParam::new(ParamName::Known(param.text().to_string()))),
        "assignment_pattern" => {
            let left = param.child_by_field("left")?;
            let mut raw = RawParam::new(pattern_name(left));
            raw.default_value = param.child_by_field("right").map(|v| collapse(v.text()));
            Some(raw)
        }
        "rest_pattern" => Some(rest_param(param)),
        "object_pattern" | "array_pattern" => Some(RawParam::new(ParamName::Pattern)),
        _ => None,
    }
}

/// `...name` keeps its name; `...[a, b]` is a pattern.
fn rest_param<'t, N: SyntaxNode<'t>>(rest: N) -> RawParam {
    let name = match rest.named_children().first() {
        Some(inner) => pattern_name(*inner),
        None => ParamName::Pattern,
    };
    let mut raw = RawParam::new(name);
    raw.is_rest = true;
    raw
}

fn parameters<'t, N: SyntaxNode<'t>>(func: N) -> Vec<ParameterDescriptor> {
    let raw: Vec<RawParam> = if let Some(list) = func.child_by_field("parameters") {
        list.named_children().into_iter().filter_map(raw_param).collect()
    } else if let Some(single) = func.child_by_field("parameter") {
        raw_param(single).into_iter().collect()
    } else {
        Vec::new()
    };
    name_parameters(raw)
}

/// Assign synthetic names to patterns and make every name unique.
fn name_parameters(raw: Vec<RawParam>) -> Vec<ParameterDescriptor> {
    let mut used: HashSet<String> = raw
        .iter()
        .filter_map(|p| match &p.name {
            ParamName::Known(name) => Some(name.clone()),
            ParamName::Pattern => None,
        })
        .collect();
    let mut next_pattern = 0usize;
    let mut seen = HashSet::new();

    raw.into_iter()
        .map(|p| {
            let (name, is_pattern) = match p.name {
                ParamName::Known(name) => (name, false),
                ParamName::Pattern => {
                    let name = loop {
                        let candidate = synthetic_name(next_pattern);
                        next_pattern += 1;
                        if !used.contains(&candidate) {
                            break candidate;
                        }
                    };
                    used.insert(name.clone());
                    (name, true)
                }
            };
            // Duplicate declared names only occur in broken code; suffix them.
            let name = if seen.contains(&name) {
                let mut n = 1;
                loop {
                    let candidate = format!("{name}{n}");
                    if !used.contains(&candidate) && !seen.contains(&candidate) {
                        break candidate;
                    }
                    n += 1;
                }
            } else {
                name
            };
            seen.insert(name.clone());
            ParameterDescriptor {
                name,
                type_text: p.type_text,
                is_optional: p.is_optional,
                default_value: p.default_value,
                is_rest: p.is_rest,
                is_pattern,
            }
        })
        .collect()
}

fn synthetic_name(index: usize) -> String {
    if index == 0 {
        PATTERN_PARAM_BASE.to_string()
    } else {
        format!("{PATTERN_PARAM_BASE}{index}")
    }
}

fn type_parameters<'t, N: SyntaxNode<'t>>(node: N) -> Vec<String> {
    let Some(list) = node.child_by_field("type_parameters") else {
        return Vec::new();
    };
    list.named_children()
        .into_iter()
        .filter(|p| p.kind() == "type_parameter")
        .filter_map(|p| p.child_by_field("name"))
        .map(|n| n.text().to_string())
        .collect()
}

/// Constructors of `throw new X(..)` statements in the body, first occurrence
/// order, ignoring nested functions and classes.
fn thrown_types<'t, N: SyntaxNode<'t>>(func: N) -> Vec<String> {
    let Some(body) = func.child_by_field("body") else {
        return Vec::new();
    };
    let mut found: Vec<String> = Vec::new();
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        if node.kind() == "throw_statement" {
            let constructor = node
                .named_children()
                .into_iter()
                .find(|c| c.kind() == "new_expression")
                .and_then(|n| n.child_by_field("constructor"));
            if let Some(ctor) = constructor {
                let name = collapse(ctor.text());
                if !found.contains(&name) {
                    found.push(name);
                }
            }
            continue;
        }
        stack.extend(
            node.named_children()
                .into_iter()
                .rev()
                .filter(|c| !kinds::is_nested_scope(c.kind())),
        );
    }
    found
}

fn decorator_name<'t, N: SyntaxNode<'t>>(decorator: N) -> Option<String> {
    let expr = decorator.named_children().into_iter().next()?;
    let callee = match expr.kind() {
        "call_expression" => expr.child_by_field("function")?,
        _ => expr,
    };
    Some(collapse(callee.text()))
}

fn decorators<'t, N: SyntaxNode<'t>>(node: N) -> Vec<String> {
    let mut found = leading_decorators(node);
    found.extend(node.named_children());
    if let Some(export) = node.parent().filter(|p| p.kind() == "export_statement") {
        found.extend(export.named_children());
    }
    let mut names: Vec<String> = found
        .into_iter()
        .filter(|c| c.kind() == "decorator")
        .filter_map(decorator_name)
        .collect();
    names.dedup();
    names
}

/// Name of the class, interface or enum a member belongs to.
fn container_name<'t, N: SyntaxNode<'t>>(node: N) -> Option<String> {
    ancestors(node)
        .find(|a| {
            kinds::is_class_declaration(a.kind())
                || matches!(a.kind(), "interface_declaration" | "enum_declaration" | "class")
        })
        .and_then(|c| c.child_by_field("name"))
        .map(|n| n.text().to_string())
}

fn heritage_type<'t, N: SyntaxNode<'t>>(node: N) -> String {
    collapse(node.text())
}

fn class_heritage<'t, N: SyntaxNode<'t>>(class: N, desc: &mut SignatureDescriptor) {
    let Some(heritage) = class
        .named_children()
        .into_iter()
        .find(|c| c.kind() == "class_heritage")
    else {
        return;
    };
    for clause in heritage.named_children() {
        match clause.kind() {
            "extends_clause" => {
                if let Some(value) = clause.child_by_field("value") {
                    let mut name = collapse(value.text());
                    if let Some(args) = clause.child_by_field("type_arguments") {
                        name.push_str(&collapse(args.text()));
                    }
                    desc.extends.push(name);
                }
            }
            "implements_clause" => desc.implements.extend(
                clause
                    .named_children()
                    .into_iter()
                    .filter(|t| !kinds::is_comment(t.kind()))
                    .map(heritage_type),
            ),
            _ => {}
        }
    }
}

fn interface_heritage<'t, N: SyntaxNode<'t>>(interface: N) -> Vec<String> {
    interface
        .named_children()
        .into_iter()
        .filter(|c| matches!(c.kind(), "extends_type_clause" | "extends_clause"))
        .flat_map(|clause| clause.named_children())
        .filter(|t| !kinds::is_comment(t.kind()))
        .map(heritage_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaBuilder;
    use dt_core::MethodKind;

    #[test]
    fn typed_parameters_and_return() {
        let src = "function f(a: number, b?: string): boolean {}";
        let mut b = ArenaBuilder::new(src);
        let func = b.node(ArenaBuilder::ROOT, "function_declaration", 0..src.len());
        b.field(func, "name", "identifier", 9..10);
        let params = b.field(func, "parameters", "formal_parameters", 10..33);

        let a = b.node(params, "required_parameter", 11..20);
        b.field(a, "pattern", "identifier", 11..12);
        let ta = b.field(a, "type", "type_annotation", 12..20);
        b.node(ta, "predefined_type", 14..20);

        let bp = b.node(params, "optional_parameter", 22..32);
        b.field(bp, "pattern", "identifier", 22..23);
        let tb = b.field(bp, "type", "type_annotation", 24..32);
        b.node(tb, "predefined_type", 26..32);

        let rt = b.field(func, "return_type", "type_annotation", 33..42);
        b.node(rt, "predefined_type", 35..42);
        b.field(func, "body", "statement_block", 43..45);
        let tree = b.build();

        let node = tree.root().children()[0];
        let desc = extract(node, DocumentableShape::FunctionLike);
        assert_eq!(desc.parameters.len(), 2);
        assert_eq!(desc.parameters[0].name, "a");
        assert_eq!(desc.parameters[0].type_text.as_deref(), Some("number"));
        assert!(desc.parameters[1].is_optional);
        assert_eq!(desc.return_type.as_deref(), Some("boolean"));
        assert_eq!(display_name(node), Some("f"));
    }

    #[test]
    fn patterns_get_positional_names_around_declared_ones() {
        let raw = vec![
            RawParam::new(ParamName::Pattern),
            RawParam::new(ParamName::Known("args1".into())),
            RawParam::new(ParamName::Pattern),
        ];
        let names: Vec<_> = name_parameters(raw).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["args", "args1", "args2"]);
    }

    #[test]
    fn duplicate_names_are_made_unique() {
        let raw = vec![
            RawParam::new(ParamName::Known("a".into())),
            RawParam::new(ParamName::Known("a".into())),
        ];
        let names: Vec<_> = name_parameters(raw).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "a1"]);
    }

    #[test]
    fn setter_member_of_class() {
        let src = "class A { static set x(v) {} }";
        let mut b = ArenaBuilder::new(src);
        let class = b.node(ArenaBuilder::ROOT, "class_declaration", 0..src.len());
        b.field(class, "name", "type_identifier", 6..7);
        let body = b.field(class, "body", "class_body", 8..src.len());
        let method = b.node(body, "method_definition", 10..28);
        b.token(method, "static", 10..16);
        b.token(method, "set", 17..20);
        b.field(method, "name", "property_identifier", 21..22);
        let params = b.field(method, "parameters", "formal_parameters", 22..25);
        b.node(params, "identifier", 23..24);
        b.field(method, "body", "statement_block", 26..28);
        let tree = b.build();

        let method = tree.root().children()[0].children()[1].children()[0];
        let desc = extract(method, DocumentableShape::MethodLike(MethodKind::Setter));
        assert!(desc.is_static);
        assert_eq!(desc.member_of.as_deref(), Some("A"));
        assert_eq!(desc.parameters[0].name, "v");
        assert!(!desc.can_return());
    }

    #[test]
    fn collapse_normalizes_whitespace() {
        assert_eq!(collapse("Map<\n  string,\n  number\n>"), "Map< string, number >");
    }
}
