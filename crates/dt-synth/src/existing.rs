//! Minimal reader for documentation comments already in the source.
//!
//! Only tag names and raw bodies are recovered; types and names inside
//! bodies are never re-parsed beyond what merging needs.

use dt_core::{CommentBlock, TagLine};

use crate::error::SynthError;

/// Tags that mark a block as describing the whole file.
const FILE_HEADER_TAGS: [&str; 6] = [
    "file",
    "fileoverview",
    "overview",
    "license",
    "copyright",
    "preserve",
];

/// Whether `text` is a `/** ... */` documentation comment. `/**/` is not.
pub fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

/// Parse a documentation comment into a block with an empty indent.
pub fn parse_block(text: &str) -> Result<CommentBlock, SynthError> {
    let text = text.trim();
    if !is_doc_comment(text) {
        return Err(malformed("not a documentation comment"));
    }
    if text.len() < 5 || !text.ends_with("*/") {
        return Err(malformed("unterminated comment"));
    }

    let inner = &text[3..text.len() - 2];
    let compact = !inner.contains('\n');
    let mut lines: Vec<&str> = inner.lines().map(clean_line).collect();
    if !compact {
        // The `/**` and `*/` lines only count when they carry text.
        if lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
    } else if lines.iter().all(|l| l.is_empty()) {
        lines.clear();
    }

    let mut block = CommentBlock::new("");
    block.compact = compact;
    for line in lines {
        if let Some(rest) = line.strip_prefix('@') {
            let (tag, body) = match rest.split_once(char::is_whitespace) {
                Some((tag, body)) => (tag, body.trim_start()),
                None => (rest, ""),
            };
            if !tag.starts_with(|c: char| c.is_ascii_alphabetic()) {
                return Err(malformed(&format!("invalid tag name '@{tag}'")));
            }
            block.tags.push(TagLine::new(tag, body));
        } else if let Some(current) = block.tags.last_mut() {
            current.body.push('\n');
            current.body.push_str(line);
        } else {
            block.description.push(line.to_string());
        }
    }

    for tag in &mut block.tags {
        let trimmed = tag.body.trim_end_matches(['\n', ' ']).len();
        tag.body.truncate(trimmed);
    }
    Ok(block)
}

/// Strip leading whitespace, one `*` and one following space; trim the end.
fn clean_line(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line);
    let line = line.strip_prefix(' ').unwrap_or(line);
    line.trim_end()
}

/// Whether a parsed block documents the file rather than a declaration.
pub fn is_file_header(block: &CommentBlock) -> bool {
    block
        .tags
        .iter()
        .any(|t| FILE_HEADER_TAGS.contains(&t.tag.to_ascii_lowercase().as_str()))
}

fn malformed(reason: &str) -> SynthError {
    SynthError::MalformedExistingComment {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_block() {
        let block = parse_block(
            "/**\n   * Adds two numbers.\n   *\n   * @param {number} a first\n   *   operand\n   * @returns {number}\n   */",
        )
        .unwrap();
        assert!(!block.compact);
        assert_eq!(block.description, vec!["Adds two numbers.", ""]);
        assert_eq!(block.tags.len(), 2);
        assert_eq!(block.tags[0].body, "{number} a first\n  operand");
        assert_eq!(block.tags[1].tag, "returns");
    }

    #[test]
    fn rendered_placeholder_round_trips() {
        let block = parse_block("/**\n *\n * @param a\n */").unwrap();
        assert_eq!(block.description, vec![""]);
        assert_eq!(block.tag_names(), vec!["param"]);
        assert_eq!(block.lines(), vec!["/**", " *", " * @param a", " */"]);
    }

    #[test]
    fn text_on_delimiter_lines_is_kept() {
        let block = parse_block("/** Summary.\n * @param a */").unwrap();
        assert_eq!(block.description, vec!["Summary."]);
        assert_eq!(block.tags[0].body, "a");
    }

    #[test]
    fn compact_blocks() {
        let block = parse_block("/** Red channel. */").unwrap();
        assert!(block.compact);
        assert_eq!(block.description, vec!["Red channel."]);
        let empty = parse_block("/** */").unwrap();
        assert!(empty.description.is_empty());
        assert_eq!(empty.lines(), vec!["/** */"]);
    }

    #[test]
    fn trailing_blank_continuations_are_dropped() {
        let block = parse_block("/**\n * @example\n *   run()\n *\n */").unwrap();
        assert_eq!(block.tags[0].body, "\n  run()");
    }

    #[test]
    fn crlf_lines() {
        let block = parse_block("/**\r\n * Text.\r\n * @param a\r\n */").unwrap();
        assert_eq!(block.description, vec!["Text."]);
        assert_eq!(block.tags[0].body, "a");
    }

    #[test]
    fn malformed_blocks() {
        assert!(matches!(
            parse_block("/**\n * @ oops\n */"),
            Err(SynthError::MalformedExistingComment { .. })
        ));
        assert!(matches!(
            parse_block("/**\n * never closed"),
            Err(SynthError::MalformedExistingComment { .. })
        ));
        assert!(parse_block("/**/").is_err());
        assert!(parse_block("// line").is_err());
    }

    #[test]
    fn file_headers() {
        let block = parse_block("/**\n * @fileoverview Utilities.\n */").unwrap();
        assert!(is_file_header(&block));
        let block = parse_block("/**\n * @param a\n */").unwrap();
        assert!(!is_file_header(&block));
    }
}
