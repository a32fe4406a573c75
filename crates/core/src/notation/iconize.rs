//! Iconizer: replaces motion, direction, and button tokens with glyphs.
//!
//! Works one segment at a time so every glyph keeps the color of the token
//! it came from. The walk is a single left-to-right cursor: at each position
//! the first table entry that matches wins, otherwise one literal character
//! is emitted.

use serde::Serialize;

use super::colorize::is_word_char;
use super::glyphs::{AliasKind, DisplayClass, MOTION_GLYPHS, MotionGlyph};
use super::patterns::{InputPattern, PatternRegistry};
use super::segment::Segment;

/// One node of an iconized notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum IconNode {
    /// Literal text no glyph matched.
    Text {
        /// The literal text.
        text: String,
        /// Color inherited from the segment, if it was an input token.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Image glyph for a motion, direction, or modifier.
    Motion {
        /// Glyph name (e.g. `"QCF"`).
        name: &'static str,
        /// Image asset file name.
        file: &'static str,
        /// Display class.
        class: DisplayClass,
        /// Color inherited from the segment.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Drawn button glyph.
    Button {
        /// Button label.
        label: String,
        /// Fill color of the label text.
        text_color: String,
        /// Color inherited from the segment.
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
}

impl IconNode {
    /// Whether this node is a glyph rather than literal text.
    pub fn is_glyph(&self) -> bool {
        !matches!(self, IconNode::Text { .. })
    }

    /// Glyph name or button label; `None` for text.
    pub fn glyph_name(&self) -> Option<&str> {
        match self {
            IconNode::Text { .. } => None,
            IconNode::Motion { name, .. } => Some(name),
            IconNode::Button { label, .. } => Some(label),
        }
    }
}

enum Hit<'a> {
    Motion(&'static MotionGlyph),
    Button(&'a InputPattern),
}

/// Iconize one segment.
pub fn iconize(segment: &Segment, registry: &PatternRegistry) -> Vec<IconNode> {
    let mut out = Vec::new();
    iconize_into(segment, registry, &mut out);
    out
}

/// Iconize a sequence of segments, preserving order.
pub fn iconize_segments(segments: &[Segment], registry: &PatternRegistry) -> Vec<IconNode> {
    let mut out = Vec::new();
    for segment in segments {
        iconize_into(segment, registry, &mut out);
    }
    out
}

fn iconize_into(segment: &Segment, registry: &PatternRegistry, out: &mut Vec<IconNode>) {
    match segment {
        Segment::MissingProfile => out.push(IconNode::Text {
            text: segment.display_text().to_string(),
            color: None,
        }),
        other => walk(other.source_text(), other.color(), registry, out),
    }
}

fn walk(text: &str, color: Option<&str>, registry: &PatternRegistry, out: &mut Vec<IconNode>) {
    let mut pos = 0;
    let mut after_glyph = false;
    let mut literal = String::new();

    while pos < text.len() {
        if let Some((len, hit)) = match_at(text, pos, after_glyph, registry) {
            flush_literal(&mut literal, color, out);
            push_glyph(hit, color, registry, out);
            pos += len;
            after_glyph = true;
            continue;
        }
        let Some(c) = text[pos..].chars().next() else {
            break;
        };
        literal.push(c);
        pos += c.len_utf8();
        after_glyph = false;
    }
    flush_literal(&mut literal, color, out);
}

fn flush_literal(literal: &mut String, color: Option<&str>, out: &mut Vec<IconNode>) {
    if literal.is_empty() {
        return;
    }
    out.push(IconNode::Text {
        text: std::mem::take(literal),
        color: color.map(str::to_string),
    });
}

fn push_glyph(hit: Hit<'_>, color: Option<&str>, registry: &PatternRegistry, out: &mut Vec<IconNode>) {
    match hit {
        Hit::Motion(glyph) => {
            for _ in 0..glyph.repeat {
                out.push(IconNode::Motion {
                    name: glyph.name,
                    file: glyph.file,
                    class: glyph.class,
                    color: color.map(str::to_string),
                });
            }
        }
        Hit::Button(input) => out.push(IconNode::Button {
            label: input.label.clone(),
            text_color: registry.text_color().to_string(),
            color: color.map(str::to_string),
        }),
    }
}

/// First table entry matching exactly at `pos`, with its byte length.
fn match_at<'r>(
    text: &str,
    pos: usize,
    after_glyph: bool,
    registry: &'r PatternRegistry,
) -> Option<(usize, Hit<'r>)> {
    let rest = &text[pos..];
    let prev = text[..pos].chars().next_back();
    // A glyph just emitted separates tokens the way markup would.
    let boundary = after_glyph || prev.is_none_or(|p| !is_word_char(p));

    for glyph in MOTION_GLYPHS {
        for alias in glyph.aliases {
            let Some(after) = rest.strip_prefix(alias.text) else {
                continue;
            };
            if alias_fits(alias.kind, boundary, &text[..pos], after) {
                return Some((alias.text.len(), Hit::Motion(glyph)));
            }
        }
    }

    if !boundary {
        return None;
    }
    registry.inputs().iter().find_map(|input| {
        let after = rest.strip_prefix(input.label.as_str())?;
        let next = after.chars().next();
        let fits = next.is_none_or(|c| c != ':' && !is_word_char(c));
        fits.then(|| (input.label.len(), Hit::Button(input)))
    })
}

fn alias_fits(kind: AliasKind, boundary: bool, before: &str, after: &str) -> bool {
    let next = after.chars().next();
    match kind {
        AliasKind::Shorthand => boundary,
        AliasKind::Motion => boundary && !next.is_some_and(|c| c.is_ascii_digit() || c == '.'),
        AliasKind::Word => boundary && next.is_none_or(|c| c != ':' && !is_word_char(c)),
        AliasKind::Direction => {
            let anchored = boundary || digit_then_x(before);
            let blocked = next.is_some_and(|c| {
                c.is_ascii_digit() || c == '.' || c == ')' || c.is_lowercase()
            });
            anchored && !blocked && !(kind.yields_to_multiplier() && multiplier_follows(after))
        }
    }
}

/// `before` ends in a digit followed by `x`, as in the `2x` of `2x4`. A
/// count after a button, `)`, or space (`5B x2`, `(2A)x2`) does not qualify.
fn digit_then_x(before: &str) -> bool {
    let mut chars = before.chars().rev();
    matches!(chars.next(), Some('x' | 'X')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// `x3`, `X12`: a hit multiplier rather than a new direction.
fn multiplier_follows(after: &str) -> bool {
    let mut chars = after.chars();
    matches!(chars.next(), Some('x' | 'X')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}
