//! Kind predicates over the tree-sitter TypeScript/TSX grammar.

pub fn is_function_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration" | "generator_function_declaration" | "function_signature"
    )
}

/// Function-valued expressions. `function` is the pre-0.21 grammar name of
/// `function_expression`.
pub fn is_function_value(kind: &str) -> bool {
    matches!(
        kind,
        "function_expression" | "function" | "generator_function" | "arrow_function"
    )
}

pub fn is_class_declaration(kind: &str) -> bool {
    matches!(kind, "class_declaration" | "abstract_class_declaration")
}

pub fn is_module_declaration(kind: &str) -> bool {
    matches!(kind, "internal_module" | "module")
}

/// Statements that wrap a declaration without changing what it documents.
pub fn is_wrapper_statement(kind: &str) -> bool {
    matches!(
        kind,
        "export_statement"
            | "ambient_declaration"
            | "expression_statement"
            | "lexical_declaration"
            | "variable_declaration"
    )
}

pub fn is_variable_statement(kind: &str) -> bool {
    matches!(kind, "lexical_declaration" | "variable_declaration")
}

/// Bodies that hold class or interface members.
pub fn is_member_container(kind: &str) -> bool {
    matches!(kind, "class_body" | "interface_body" | "object_type")
}

/// Nodes whose children are statements or members, i.e. where a cursor in
/// leading whitespace still points at a declaration on the same line.
pub fn is_block_container(kind: &str) -> bool {
    matches!(
        kind,
        "program" | "statement_block" | "class_body" | "interface_body" | "object_type" | "enum_body"
    )
}

pub fn is_comment(kind: &str) -> bool {
    kind == "comment"
}

pub fn is_type_annotation(kind: &str) -> bool {
    matches!(
        kind,
        "type_annotation"
            | "opting_type_annotation"
            | "omitting_type_annotation"
            | "asserts_annotation"
            | "type_predicate_annotation"
    )
}

pub fn is_destructuring_pattern(kind: &str) -> bool {
    matches!(kind, "object_pattern" | "array_pattern")
}

/// Nested scopes whose `throw` statements belong to someone else.
pub fn is_nested_scope(kind: &str) -> bool {
    is_function_declaration(kind)
        || is_function_value(kind)
        || is_class_declaration(kind)
        || matches!(kind, "class" | "method_definition")
}
