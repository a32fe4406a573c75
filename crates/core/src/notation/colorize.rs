//! Token colorizer.
//!
//! Colorizing runs in two pure phases so each can be inspected on its own:
//! [`find_matches`] collects every candidate token per input, and
//! [`resolve_overlaps`] keeps the highest-priority candidates. [`colorize`]
//! then interleaves the survivors with the literal text between them.

use serde::Serialize;

use super::patterns::{InputPattern, PatternRegistry};
use super::segment::Segment;

/// A candidate token found while scanning notation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRange {
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset one past the last matched character.
    pub end: usize,
    /// Input label.
    pub label: String,
    /// Input color.
    pub color: String,
    /// Matched text.
    pub text: String,
    /// Declaration index of the input that produced this match.
    pub priority: usize,
}

impl MatchRange {
    fn overlaps(&self, other: &MatchRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collect candidate tokens for every input, in registry order. Matches of
/// one input never overlap each other; matches of different inputs may.
pub fn find_matches(text: &str, registry: &PatternRegistry) -> Vec<MatchRange> {
    let mut out = Vec::new();
    for input in registry.inputs() {
        scan_input(text, input, &mut out);
    }
    out
}

fn scan_input(text: &str, input: &InputPattern, out: &mut Vec<MatchRange>) {
    let re = input.regex();
    let mut at = 0;
    while at <= text.len() {
        let Some(m) = re.find_at(text, at) else {
            break;
        };
        if m.is_empty() {
            // Every input token has at least one character.
            break;
        }
        if starts_inside_word(text, m.start()) {
            // Leading boundary failed; retry one character later.
            at = next_char_boundary(text, m.start());
            continue;
        }
        out.push(MatchRange {
            start: m.start(),
            end: m.end(),
            label: input.label.clone(),
            color: input.color.clone(),
            text: m.as_str().to_string(),
            priority: input.priority,
        });
        at = m.end();
    }
}

/// A token may not begin in the middle of a word: `P` must not match the
/// tail of `HP`.
fn starts_inside_word(text: &str, start: usize) -> bool {
    let prev = text[..start].chars().next_back();
    let first = text[start..].chars().next();
    matches!((prev, first), (Some(p), Some(f)) if is_word_char(p) && is_word_char(f))
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| pos + c.len_utf8())
}

/// Keep non-overlapping matches, preferring the input declared first, and
/// return them sorted by start offset. Losing matches are dropped whole.
pub fn resolve_overlaps(mut matches: Vec<MatchRange>) -> Vec<MatchRange> {
    matches.sort_by_key(|m| (m.priority, m.start));
    let mut kept: Vec<MatchRange> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if kept.iter().all(|k| !k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|m| m.start);
    kept
}

/// Colorize notation text against `registry`.
///
/// The concatenated [`Segment::source_text`] of the result always equals
/// `text`, and the same inputs always produce the same segments.
pub fn colorize(text: &str, registry: &PatternRegistry) -> Vec<Segment> {
    let ranges = resolve_overlaps(find_matches(text, registry));
    build_segments(text, ranges)
}

fn build_segments(text: &str, ranges: Vec<MatchRange>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            segments.push(Segment::text(&text[cursor..range.start]));
        }
        cursor = range.end;
        segments.push(Segment::Input {
            text: range.text,
            label: range.label,
            color: range.color,
        });
    }
    if cursor < text.len() {
        segments.push(Segment::text(&text[cursor..]));
    }
    segments
}
