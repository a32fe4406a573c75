//! Markdown-like document reader.
//!
//! Understands just enough structure to feed the notation pipeline:
//!
//! - an optional `---` fenced YAML frontmatter block,
//! - paragraphs separated by blank lines,
//! - `>` block quotes,
//! - `#` headings and list items, one block each,
//! - fenced code blocks (never scanned for notation),
//! - inline `` `code` `` spans.
//!
//! Every block keeps the byte span it came from so diagnostics can point
//! back into the source.

use std::collections::BTreeMap;

use serde_yml::Value;

use super::{Block, BlockKind, Node};
use combo_notation_diagnostics::Span;

/// A parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Scalar frontmatter fields as text.
    pub frontmatter: BTreeMap<String, String>,
    /// Span of the frontmatter block including its fences.
    pub frontmatter_span: Option<Span>,
    /// Body blocks in order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Frontmatter field `key`, if present and non-empty.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.frontmatter
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// A source line with its byte offsets. `end` excludes the line break.
struct Line<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

fn lines(source: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    for raw in source.split_inclusive('\n') {
        let text = raw
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(raw);
        out.push(Line {
            text,
            start,
            end: start + text.len(),
        });
        start += raw.len();
    }
    out
}

/// Parse `source` into frontmatter and blocks.
pub fn parse_document(source: &str) -> Document {
    let lines = lines(source);
    let mut doc = Document::default();
    let mut i = 0;

    if let Some((fields, end_line)) = parse_frontmatter(&lines) {
        doc.frontmatter = fields;
        doc.frontmatter_span = Some(Span::new(lines[0].start, lines[end_line].end));
        i = end_line + 1;
    }

    while i < lines.len() {
        let line = &lines[i];
        let trimmed = line.text.trim_start();
        if trimmed.is_empty() {
            i += 1;
        } else if let Some(fence) = fence_marker(trimmed) {
            i = parse_fenced(&lines, i, fence, &mut doc.blocks);
        } else if is_quote_line(trimmed) {
            i = parse_run(&lines, i, BlockKind::Quote, &mut doc.blocks);
        } else if let Some((level, text)) = heading(trimmed) {
            let span = Span::new(line.start, line.end);
            doc.blocks
                .push(Block::new(BlockKind::Heading(level), parse_inline(text)).with_span(span));
            i += 1;
        } else if list_item(trimmed).is_some() {
            i = parse_run(&lines, i, BlockKind::ListItem, &mut doc.blocks);
        } else {
            i = parse_run(&lines, i, BlockKind::Paragraph, &mut doc.blocks);
        }
    }
    doc
}

/// Fields of a `---` fenced YAML block on the first line, and the index of
/// its closing fence. YAML that fails to parse yields no fields.
fn parse_frontmatter(lines: &[Line<'_>]) -> Option<(BTreeMap<String, String>, usize)> {
    if lines.first()?.text.trim_end() != "---" {
        return None;
    }
    let close = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.text.trim_end() == "---")
        .map(|(idx, _)| idx)?;
    let body: Vec<&str> = lines[1..close].iter().map(|l| l.text).collect();
    let yaml = match serde_yml::from_str::<Value>(&body.join("\n")) {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable frontmatter");
            Value::Null
        }
    };
    let mut fields = BTreeMap::new();
    if let Value::Mapping(map) = yaml {
        for (key, value) in &map {
            if let (Some(key), Some(value)) = (scalar(key), scalar(value)) {
                fields.insert(key, value);
            }
        }
    }
    Some((fields, close))
}

/// A YAML scalar as text; `null` reads as empty. Lists and maps are skipped.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn fence_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

fn is_quote_line(trimmed: &str) -> bool {
    trimmed.starts_with('>')
}

/// `## Title` as level and text. The marker needs a space after it.
fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    let level = u8::try_from(hashes).ok().filter(|l| (1..=6).contains(l))?;
    let rest = &trimmed[hashes..];
    if rest.trim().is_empty() {
        return Some((level, ""));
    }
    let text = rest.strip_prefix([' ', '\t'])?;
    Some((level, text.trim()))
}

/// Text after a `-`, `*`, `+`, `1.` or `1)` list marker.
fn list_item(trimmed: &str) -> Option<&str> {
    if let Some(rest) = trimmed.strip_prefix(['-', '*', '+']) {
        return rest.strip_prefix(' ');
    }
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    trimmed[digits..].strip_prefix(['.', ')'])?.strip_prefix(' ')
}

/// Whether `trimmed`, after the first line of a `kind` block, starts a new
/// block instead of continuing it.
fn ends_run(trimmed: &str, kind: BlockKind) -> bool {
    if trimmed.is_empty() || fence_marker(trimmed).is_some() {
        return true;
    }
    if kind == BlockKind::Quote {
        return !is_quote_line(trimmed);
    }
    is_quote_line(trimmed) || heading(trimmed).is_some() || list_item(trimmed).is_some()
}

/// Fenced code from line `open` to its closing fence (or end of input).
/// Returns the index of the first line after the block.
fn parse_fenced(lines: &[Line<'_>], open: usize, fence: &str, out: &mut Vec<Block>) -> usize {
    let mut body = Vec::new();
    let mut i = open + 1;
    let mut last = open;
    while i < lines.len() {
        last = i;
        if lines[i].text.trim_start().starts_with(fence) {
            i += 1;
            break;
        }
        body.push(lines[i].text);
        i += 1;
    }
    let text = body.join("\n");
    let children = vec![Node::element("code", vec![Node::Text(text)])];
    out.push(
        Block::new(BlockKind::Code, children).with_span(Span::new(lines[open].start, lines[last].end)),
    );
    i
}

/// Consecutive lines of one block kind, up to the next line that
/// [`ends_run`].
fn parse_run(lines: &[Line<'_>], first: usize, kind: BlockKind, out: &mut Vec<Block>) -> usize {
    let mut parts = Vec::new();
    let mut i = first;
    while i < lines.len() {
        let trimmed = lines[i].text.trim_start();
        if i > first && ends_run(trimmed, kind) {
            break;
        }
        let content = match kind {
            BlockKind::Quote => {
                let rest = &trimmed[1..];
                rest.strip_prefix(' ').unwrap_or(rest)
            }
            BlockKind::ListItem if i == first => list_item(trimmed).unwrap_or(trimmed),
            _ => trimmed,
        };
        parts.push(content.trim_end());
        i += 1;
    }
    let span = Span::new(lines[first].start, lines[i - 1].end);
    out.push(Block::new(kind, parse_inline(&parts.join("\n"))).with_span(span));
    i
}

/// Split text into text nodes and inline `code` elements. An unmatched
/// backtick stays literal.
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('`') else {
            break;
        };
        if open > 0 {
            nodes.push(Node::Text(rest[..open].to_string()));
        }
        nodes.push(Node::element("code", vec![Node::Text(after[..close].to_string())]));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        nodes.push(Node::Text(rest.to_string()));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_fields_and_span() {
        let src = "---\nprofile: asw\ntitle: \"Combos\"\n---\nBody =:2A:=\n";
        let doc = parse_document(src);
        assert_eq!(doc.field("profile"), Some("asw"));
        assert_eq!(doc.field("title"), Some("Combos"));
        let span = doc.frontmatter_span.unwrap();
        assert_eq!(&src[span.start..span.end], "---\nprofile: asw\ntitle: \"Combos\"\n---");
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn frontmatter_is_yaml() {
        let doc = parse_document("---\nprofile: asw # main\n---\n=:2A:=");
        assert_eq!(doc.field("profile"), Some("asw"));

        let doc = parse_document("---\nprofile:\n  alt\nrevision: 3\ndraft: true\n---\n");
        assert_eq!(doc.field("profile"), Some("alt"));
        assert_eq!(doc.field("revision"), Some("3"));
        assert_eq!(doc.field("draft"), Some("true"));
    }

    #[test]
    fn nested_and_invalid_frontmatter() {
        let doc = parse_document("---\ntags:\n  - combos\nprofile: trd\n---\nbody");
        assert_eq!(doc.field("tags"), None);
        assert_eq!(doc.field("profile"), Some("trd"));

        let doc = parse_document("---\nprofile: [asw\n---\nbody");
        assert!(doc.frontmatter.is_empty());
        assert!(doc.frontmatter_span.is_some());
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn unclosed_frontmatter_is_body() {
        let doc = parse_document("---\nprofile: asw\n");
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn empty_field_counts_as_absent() {
        let doc = parse_document("---\nprofile:\n---\n");
        assert_eq!(doc.field("profile"), None);
    }

    #[test]
    fn paragraphs_quotes_and_fences() {
        let src = "one\ntwo\n\n> quoted\n> more\n\n```\n=:A:=\n```\nafter";
        let doc = parse_document(src);
        let kinds: Vec<BlockKind> = doc.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            [BlockKind::Paragraph, BlockKind::Quote, BlockKind::Code, BlockKind::Paragraph]
        );
        assert_eq!(doc.blocks[0].text_content(), "one\ntwo");
        assert_eq!(doc.blocks[1].text_content(), "quoted\nmore");
        assert_eq!(doc.blocks[2].text_content(), "=:A:=");
        let span = doc.blocks[3].span.unwrap();
        assert_eq!(&src[span.start..span.end], "after");
    }

    #[test]
    fn list_items_are_separate_blocks() {
        let src = "intro\n- =:2A:=\n- =:5B:=\n  more\n\n1. =:236C:=\n2) x";
        let doc = parse_document(src);
        let kinds: Vec<BlockKind> = doc.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            [
                BlockKind::Paragraph,
                BlockKind::ListItem,
                BlockKind::ListItem,
                BlockKind::ListItem,
                BlockKind::ListItem,
            ]
        );
        assert_eq!(doc.blocks[1].text_content(), "=:2A:=");
        assert_eq!(doc.blocks[2].text_content(), "=:5B:=\nmore");
        assert_eq!(doc.blocks[3].text_content(), "=:236C:=");
        let span = doc.blocks[2].span.unwrap();
        assert_eq!(&src[span.start..span.end], "- =:5B:=\n  more");
    }

    #[test]
    fn headings_are_single_line_blocks() {
        let doc = parse_document("## BnB =:2A:=\nbody\n#tag\n-not a list");
        assert_eq!(doc.blocks[0].kind, BlockKind::Heading(2));
        assert_eq!(doc.blocks[0].text_content(), "BnB =:2A:=");
        assert_eq!(doc.blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(doc.blocks[1].text_content(), "body\n#tag\n-not a list");
        assert_eq!(BlockKind::Heading(2).tag(), "h2");
    }

    #[test]
    fn crlf_lines() {
        let doc = parse_document("a\r\nb\r\n\r\nc");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].text_content(), "a\nb");
    }

    #[test]
    fn inline_code_spans() {
        let nodes = parse_inline("press `comboButton` then `x");
        assert_eq!(
            nodes,
            vec![
                Node::text("press "),
                Node::element("code", vec![Node::text("comboButton")]),
                Node::text(" then `x"),
            ]
        );
    }
}
