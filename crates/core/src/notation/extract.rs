//! Notation extractor: lifts `=:payload:=` spans out of rendered text.

use std::ops::Range;

use crate::dom::{Block, BlockKind, ModeToggle, Node, NotationContainer};
use combo_notation_diagnostics::Span;

/// Inline code whose text is this becomes the mode toggle button.
pub const TOGGLE_MARKER: &str = "comboButton";

/// One delimited notation found in a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited {
    /// Byte range including the `=:` and `:=` delimiters.
    pub outer: Range<usize>,
    /// Byte range of the payload alone.
    pub payload: Range<usize>,
}

/// Find every `=:payload:=` in `text`, left to right.
///
/// The payload is at least one character, never spans a line break, and
/// ends at the first `:=`. An opener without a closer is left alone.
pub fn find_delimited(text: &str) -> Vec<Delimited> {
    let b = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i + 1 < b.len() {
        if b[i] == b'=' && b[i + 1] == b':' {
            if let Some(close) = find_closer(b, i + 2) {
                out.push(Delimited {
                    outer: i..close + 2,
                    payload: i + 2..close,
                });
                i = close + 2;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Byte offset of the `:=` closing a payload that starts at `from`.
///
/// All delimiter bytes are ASCII, so byte-wise scanning never splits a
/// multi-byte character.
fn find_closer(b: &[u8], from: usize) -> Option<usize> {
    if from >= b.len() || b[from] == b'\n' {
        return None;
    }
    let mut j = from + 1;
    while j + 1 < b.len() {
        match b[j] {
            b'\n' => return None,
            b':' if b[j + 1] == b'=' => return Some(j),
            _ => {}
        }
        j += 1;
    }
    None
}

/// Replace delimited notation in `block` with containers, returning how
/// many were created.
///
/// Code blocks and inline `code`/`pre` elements are left untouched, except
/// that inline code reading exactly `comboButton` becomes a [`ModeToggle`].
/// Existing containers are never re-scanned, so running this twice is the
/// same as running it once.
pub fn extract(block: &mut Block) -> usize {
    if block.kind == BlockKind::Code {
        return 0;
    }
    let mut created = 0;
    let children = std::mem::take(&mut block.children);
    block.children = extract_nodes(children, block.span, &mut created);
    created
}

fn extract_nodes(nodes: Vec<Node>, span: Option<Span>, created: &mut usize) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => split_text(&text, span, &mut out, created),
            Node::Element { tag, children } if tag == "code" => {
                if is_toggle_marker(&children) {
                    out.push(Node::Toggle(ModeToggle::default()));
                } else {
                    out.push(Node::Element { tag, children });
                }
            }
            Node::Element { tag, children } if tag == "pre" => {
                out.push(Node::Element { tag, children });
            }
            Node::Element { tag, children } => out.push(Node::Element {
                tag,
                children: extract_nodes(children, span, created),
            }),
            other => out.push(other),
        }
    }
    out
}

fn split_text(text: &str, span: Option<Span>, out: &mut Vec<Node>, created: &mut usize) {
    let found = find_delimited(text);
    if found.is_empty() {
        out.push(Node::Text(text.to_string()));
        return;
    }
    let mut cursor = 0;
    for d in found {
        if d.outer.start > cursor {
            out.push(Node::Text(text[cursor..d.outer.start].to_string()));
        }
        out.push(Node::Notation(NotationContainer::new(&text[d.payload], span)));
        *created += 1;
        cursor = d.outer.end;
    }
    if cursor < text.len() {
        out.push(Node::Text(text[cursor..].to_string()));
    }
}

fn is_toggle_marker(children: &[Node]) -> bool {
    let mut text = String::new();
    for child in children {
        match child {
            Node::Text(t) => text.push_str(t),
            _ => return false,
        }
    }
    text.trim() == TOGGLE_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(text: &str) -> Vec<&str> {
        find_delimited(text)
            .into_iter()
            .map(|d| &text[d.payload])
            .collect()
    }

    #[test]
    fn finds_all_in_order() {
        assert_eq!(payloads("a =:2A:= b =:5B:= c"), ["2A", "5B"]);
    }

    #[test]
    fn unterminated_opener_left_alone() {
        assert!(payloads("=:foo").is_empty());
        assert_eq!(payloads("=:foo =:bar:="), ["foo =:bar"]);
    }

    #[test]
    fn payload_never_empty_or_multiline() {
        assert!(payloads("=::=").is_empty());
        assert_eq!(payloads("=:::="), [":"]);
        assert!(payloads("=:a\nb:=").is_empty());
        assert_eq!(payloads("=:a\n=:b:="), ["b"]);
    }

    #[test]
    fn extract_preserves_siblings() {
        let mut block = Block::paragraph("Combo: =:2A 5B:= then =:236C:=!");
        assert_eq!(extract(&mut block), 2);
        assert_eq!(block.children.len(), 5);
        assert_eq!(block.children[0], Node::text("Combo: "));
        assert_eq!(block.children[2], Node::text(" then "));
        assert_eq!(block.children[4], Node::text("!"));
        let texts: Vec<&str> = block.containers().iter().map(|c| c.text_mode()).collect();
        assert_eq!(texts, ["2A 5B", "236C"]);
    }

    #[test]
    fn extract_twice_is_extract_once() {
        let mut once = Block::paragraph("x =:A:= y");
        extract(&mut once);
        let mut twice = once.clone();
        assert_eq!(extract(&mut twice), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn code_is_skipped_and_marker_becomes_toggle() {
        let mut block = Block::new(
            BlockKind::Paragraph,
            vec![
                Node::element("code", vec![Node::text("=:A:=")]),
                Node::element("code", vec![Node::text(" comboButton ")]),
                Node::element("em", vec![Node::text("=:B:=")]),
            ],
        );
        assert_eq!(extract(&mut block), 1);
        assert_eq!(block.children[0], Node::element("code", vec![Node::text("=:A:=")]));
        assert!(matches!(block.children[1], Node::Toggle(_)));
        assert_eq!(block.containers()[0].text_mode(), "B");
    }

    #[test]
    fn code_block_untouched() {
        let mut block = Block::new(BlockKind::Code, vec![Node::text("=:A:=")]);
        assert_eq!(extract(&mut block), 0);
        assert_eq!(block.children, vec![Node::text("=:A:=")]);
    }
}
