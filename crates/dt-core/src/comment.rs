use serde::{Deserialize, Serialize};

/// Semantic family of a tag, in conventional block order.
///
/// The declaration order is the rendering order: a merged block is stably
/// sorted by this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TagKind {
    Description,
    Author,
    Abstract,
    /// `@class`, `@interface`, `@enum`, `@namespace` and synonyms.
    Kind,
    Extends,
    Implements,
    Async,
    Generator,
    Template,
    Param,
    Type,
    Returns,
    Throws,
    /// Anything the engine does not manage (`@example`, `@see`, ...).
    User,
    MemberOf,
    Static,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            "description" | "desc" => Self::Description,
            "author" => Self::Author,
            "abstract" | "virtual" => Self::Abstract,
            "class" | "constructor" | "interface" | "enum" | "namespace" | "module" => Self::Kind,
            "extends" | "augments" => Self::Extends,
            "implements" => Self::Implements,
            "async" => Self::Async,
            "generator" => Self::Generator,
            "template" => Self::Template,
            "param" | "arg" | "argument" => Self::Param,
            "type" => Self::Type,
            "returns" | "return" => Self::Returns,
            "throws" | "exception" => Self::Throws,
            "memberof" | "memberOf" => Self::MemberOf,
            "static" => Self::Static,
            _ => Self::User,
        }
    }

    /// Kinds that appear at most once per block.
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            Self::Description
                | Self::Abstract
                | Self::Kind
                | Self::Async
                | Self::Generator
                | Self::Type
                | Self::Returns
                | Self::MemberOf
                | Self::Static
        )
    }

    /// Kinds whose body names the thing they document.
    pub fn has_referent(self) -> bool {
        matches!(
            self,
            Self::Param | Self::Template | Self::Extends | Self::Implements | Self::Throws
        )
    }
}

/// One tag of a documentation block. `body` holds everything after the tag
/// name; continuation lines are joined with `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLine {
    pub tag: String,
    pub body: String,
}

impl TagLine {
    pub fn new(tag: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            body: body.into(),
        }
    }

    pub fn kind(&self) -> TagKind {
        TagKind::of(&self.tag)
    }

    /// The name this tag refers to, for kinds that have one.
    ///
    /// `@param {string} [name="x"] text` yields `name`; `@extends {Base}`
    /// yields `Base`; `@template T, U` yields `T`.
    pub fn referent(&self) -> Option<String> {
        let kind = self.kind();
        if !kind.has_referent() {
            return None;
        }
        let first_line = self.body.lines().next().unwrap_or("").trim();
        let (braced, rest) = split_braced(first_line);
        let name = match kind {
            TagKind::Extends | TagKind::Implements | TagKind::Throws => match braced {
                Some(inner) => inner.trim().to_string(),
                None => first_token(rest).to_string(),
            },
            TagKind::Template => first_token(rest)
                .split(',')
                .next()
                .unwrap_or("")
                .to_string(),
            _ => {
                let token = first_token(rest)
                    .trim_start_matches('[')
                    .trim_start_matches("...");
                token
                    .split(['=', ']'])
                    .next()
                    .unwrap_or("")
                    .to_string()
            }
        };
        (!name.is_empty()).then_some(name)
    }
}

/// Split a leading `{...}` group (balanced) off `text`.
fn split_braced(text: &str) -> (Option<&str>, &str) {
    if !text.starts_with('{') {
        return (None, text);
    }
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (Some(&text[1..i]), text[i + 1..].trim_start());
                }
            }
            _ => {}
        }
    }
    (None, text)
}

fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// A rendered or merged documentation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlock {
    /// Copied from the documented node's line.
    pub indent: String,
    /// Free text before the first tag, one entry per line, kept verbatim.
    pub description: Vec<String>,
    pub tags: Vec<TagLine>,
    /// Prefer the single-line `/** text */` form when the content fits.
    pub compact: bool,
}

impl CommentBlock {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            description: Vec::new(),
            tags: Vec::new(),
            compact: false,
        }
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.tag.as_str()).collect()
    }

    fn fits_one_line(&self) -> bool {
        self.compact
            && self.description.len() + self.tags.len() <= 1
            && self.tags.iter().all(|t| !t.body.contains('\n'))
    }

    /// Block lines without indentation.
    pub fn lines(&self) -> Vec<String> {
        if self.fits_one_line() {
            let content = match (self.description.first(), self.tags.first()) {
                (Some(text), _) => text.trim().to_string(),
                (None, Some(tag)) => tag_head(tag),
                (None, None) => String::new(),
            };
            return vec![if content.is_empty() {
                "/** */".to_string()
            } else {
                format!("/** {content} */")
            }];
        }

        let mut lines = Vec::with_capacity(self.description.len() + self.tags.len() + 2);
        lines.push("/**".to_string());
        for text in &self.description {
            lines.push(star_line(text));
        }
        for tag in &self.tags {
            lines.push(star_line(&tag_head(tag)));
            for continuation in tag.body.split('\n').skip(1) {
                lines.push(star_line(continuation));
            }
        }
        lines.push(" */".to_string());
        lines
    }

    /// The full block text: every line indented, lines joined by `newline`,
    /// no trailing newline.
    pub fn format(&self, newline: &str) -> String {
        let separator = format!("{newline}{}", self.indent);
        format!("{}{}", self.indent, self.lines().join(&separator))
    }
}

fn tag_head(tag: &TagLine) -> String {
    let first = tag.body.split('\n').next().unwrap_or("");
    if first.is_empty() {
        format!("@{}", tag.tag)
    } else {
        format!("@{} {}", tag.tag, first)
    }
}

fn star_line(text: &str) -> String {
    if text.is_empty() {
        " *".to_string()
    } else {
        format!(" * {text}")
    }
}
