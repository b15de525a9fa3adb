use dt_core::{CommentBlock, DocumentableShape, ParameterDescriptor, SignatureDescriptor, TagLine};

use crate::config::{ReturnsPolicy, SynthConfig};

/// Defaults longer than this render as a bare `[name]`.
pub const MAX_DEFAULT_LEN: usize = 40;

/// Render a fresh block for `desc`. Deterministic; never called for
/// `Unsupported`.
pub fn render(
    desc: &SignatureDescriptor,
    name: Option<&str>,
    indent: &str,
    config: &SynthConfig,
) -> CommentBlock {
    let mut block = CommentBlock::new(indent);
    let tags = &mut block.tags;

    if config.include_description_tag {
        tags.push(TagLine::new("description", ""));
    } else {
        block.description.push(String::new());
    }

    if config.include_author_tag {
        tags.push(TagLine::new("author", config.author_name.trim()));
    }
    if desc.is_abstract {
        tags.push(TagLine::new("abstract", ""));
    }
    if let Some(kind) = kind_tag(desc.shape, name) {
        tags.push(kind);
    }
    for base in &desc.extends {
        tags.push(TagLine::new("extends", format!("{{{base}}}")));
    }
    for iface in &desc.implements {
        tags.push(TagLine::new("implements", format!("{{{iface}}}")));
    }
    if desc.is_async {
        tags.push(TagLine::new("async", ""));
    }
    if desc.is_generator {
        tags.push(TagLine::new("generator", ""));
    }
    for generic in &desc.type_parameters {
        tags.push(TagLine::new("template", generic.as_str()));
    }
    for param in &desc.parameters {
        tags.push(TagLine::new("param", param_body(param, config)));
    }
    if desc.shape == DocumentableShape::PropertyLike {
        if let Some(ty) = desc.value_type.as_deref().filter(|_| config.include_types) {
            tags.push(TagLine::new("type", format!("{{{ty}}}")));
        }
    }
    if let Some(body) = returns_body(desc, config) {
        tags.push(TagLine::new(config.returns_tag_name.as_str(), body));
    }
    if config.include_throws {
        for error in &desc.throws {
            tags.push(TagLine::new("throws", format!("{{{error}}}")));
        }
    }
    if config.include_member_of {
        if let Some(container) = &desc.member_of {
            tags.push(TagLine::new("memberof", container.as_str()));
        }
    }
    if desc.is_static {
        tags.push(TagLine::new("static", ""));
    }

    // Enum members and untyped properties stay `/** */`; a `@type` line
    // below the placeholder makes the block multi-line.
    block.compact = matches!(
        desc.shape,
        DocumentableShape::EnumMember | DocumentableShape::PropertyLike
    );
    block
}

fn kind_tag(shape: DocumentableShape, name: Option<&str>) -> Option<TagLine> {
    let name = name.unwrap_or("");
    match shape {
        DocumentableShape::ClassLike => Some(TagLine::new("class", name)),
        DocumentableShape::InterfaceLike => Some(TagLine::new("interface", name)),
        DocumentableShape::EnumLike => Some(TagLine::new("enum", "")),
        DocumentableShape::ModuleLike => {
            let unquoted = name.trim_matches(|c| c == '"' || c == '\'');
            if unquoted.len() != name.len() {
                Some(TagLine::new("module", unquoted))
            } else {
                Some(TagLine::new("namespace", name))
            }
        }
        _ => None,
    }
}

fn param_body(param: &ParameterDescriptor, config: &SynthConfig) -> String {
    let declared = param.type_text.as_deref().filter(|_| config.include_types);
    let inferred = if declared.is_none() && config.infer_types_from_names {
        infer_type(&param.name)
    } else {
        None
    };
    let ty = match (declared, inferred) {
        (Some(ty), _) if param.is_rest => Some(format!("...{}", rest_element(ty))),
        (Some(ty), _) => Some(ty.to_string()),
        (None, Some(ty)) => Some(ty.to_string()),
        (None, None) => None,
    };

    let name = match param.default_value.as_deref() {
        Some(value) if value.len() <= MAX_DEFAULT_LEN => {
            format!("[{}={}]", param.name, value)
        }
        Some(_) => format!("[{}]", param.name),
        None if param.is_optional => format!("[{}]", param.name),
        None => param.name.clone(),
    };

    match ty {
        Some(ty) => format!("{{{ty}}} {name}"),
        None => name,
    }
}

/// Element type of a rest parameter's array type.
fn rest_element(ty: &str) -> &str {
    let ty = ty.trim();
    if let Some(elem) = ty.strip_suffix("[]") {
        return elem.trim_start_matches("readonly ").trim();
    }
    for wrapper in ["Array<", "ReadonlyArray<"] {
        if let Some(inner) = ty.strip_prefix(wrapper).and_then(|t| t.strip_suffix('>')) {
            return inner.trim();
        }
    }
    ty
}

fn returns_body(desc: &SignatureDescriptor, config: &SynthConfig) -> Option<String> {
    if !desc.can_return() {
        return None;
    }
    let typed = desc
        .return_type
        .as_deref()
        .filter(|_| config.include_types)
        .map(|ty| format!("{{{ty}}}"));
    match config.returns {
        ReturnsPolicy::TypeDriven => {
            desc.return_type.as_ref()?;
            Some(typed.unwrap_or_default())
        }
        ReturnsPolicy::Always => Some(typed.unwrap_or_default()),
    }
}

/// Guess a JSDoc type from a parameter name.
pub fn infer_type(name: &str) -> Option<&'static str> {
    let has_upper_after = |prefix: &str| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    };

    if ["is", "has", "can", "should"].iter().any(|p| has_upper_after(p)) {
        return Some("boolean");
    }
    match name {
        "count" | "index" | "length" | "size" | "i" | "j" | "n" => return Some("number"),
        "name" | "text" | "message" | "str" | "path" | "url" => return Some("string"),
        "callback" | "cb" | "fn" | "handler" => return Some("Function"),
        _ => {}
    }
    // Hungarian prefixes, longest first so `str` wins over `s...`.
    const PREFIXES: [(&str, &str); 8] = [
        ("str", "string"),
        ("num", "number"),
        ("arr", "Array"),
        ("obj", "Object"),
        ("fn", "Function"),
        ("n", "number"),
        ("b", "boolean"),
        ("o", "Object"),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| has_upper_after(prefix))
        .map(|(_, ty)| *ty)
}
