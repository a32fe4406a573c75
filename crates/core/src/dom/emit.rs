//! HTML emitter for rendered blocks.

use std::fmt::Write as _;

use super::{Block, ModeToggle, Node, NotationContainer, Presentation};
use crate::notation::glyphs::button_svg;
use crate::notation::{IconNode, Segment};

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Prefix prepended to motion glyph file names.
    pub icon_base: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            icon_base: "icons/".to_string(),
        }
    }
}

/// Render `block` as an HTML fragment.
pub fn emit_html(block: &Block, config: &EmitConfig) -> String {
    let mut out = String::new();
    let tag = block.kind.tag();
    let _ = write!(out, "<{tag}>");
    for node in &block.children {
        emit_node(node, config, &mut out);
    }
    let _ = write!(out, "</{tag}>");
    out
}

/// Render several blocks separated by newlines.
pub fn emit_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>, config: &EmitConfig) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&emit_html(block, config));
        out.push('\n');
    }
    out
}

fn emit_node(node: &Node, config: &EmitConfig, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, out),
        Node::Element { tag, children } => {
            let _ = write!(out, "<{tag}>");
            for child in children {
                emit_node(child, config, out);
            }
            let _ = write!(out, "</{tag}>");
        }
        Node::Notation(c) => emit_container(c, config, out),
        Node::Toggle(t) => emit_toggle(t, out),
    }
}

fn emit_toggle(toggle: &ModeToggle, out: &mut String) {
    let _ = write!(out, "<button class=\"combo\">{}</button>", toggle.label());
}

fn emit_container(c: &NotationContainer, config: &EmitConfig, out: &mut String) {
    out.push_str("<span class=\"notation");
    if c.is_warning() {
        out.push_str(" warning");
    }
    if c.is_iconized() {
        out.push_str(" image-notation");
    }
    out.push_str("\">");
    match c.presentation() {
        Presentation::Raw => escape_into(c.text_mode(), out),
        Presentation::Colored(segments) => {
            for segment in segments {
                emit_segment(segment, out);
            }
        }
        Presentation::Icons(nodes) => {
            for node in nodes {
                emit_icon(node, config, out);
            }
        }
    }
    out.push_str("</span>");
}

fn emit_segment(segment: &Segment, out: &mut String) {
    match segment {
        Segment::Input { text, label, color } => {
            out.push_str("<span data-input=\"");
            escape_into(label, out);
            out.push_str("\" style=\"color: ");
            escape_into(color, out);
            out.push_str("\">");
            escape_into(text, out);
            out.push_str("</span>");
        }
        other => escape_into(other.display_text(), out),
    }
}

fn emit_icon(node: &IconNode, config: &EmitConfig, out: &mut String) {
    match node {
        IconNode::Text { text, color } => match color {
            Some(color) => {
                out.push_str("<span style=\"color: ");
                escape_into(color, out);
                out.push_str("\">");
                escape_into(text, out);
                out.push_str("</span>");
            }
            None => escape_into(text, out),
        },
        IconNode::Motion {
            name, file, class, ..
        } => {
            out.push_str("<img src=\"");
            escape_into(&config.icon_base, out);
            escape_into(file, out);
            let _ = write!(out, "\" class=\"{}\" alt=\"{name}\">", class.css_class());
        }
        IconNode::Button {
            label, text_color, ..
        } => {
            out.push_str("<span class=\"buttonIcon\">");
            out.push_str(&button_svg(label, text_color));
            out.push_str("</span>");
        }
    }
}

/// Append `text` to `out` with HTML metacharacters escaped.
pub fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
