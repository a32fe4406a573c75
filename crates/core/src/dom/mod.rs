//! Host block model: the rendered tree a notation pass works on.
//!
//! A [`Block`] is what the host hands over after rendering one piece of a
//! document (a paragraph, a quote, a code block). The extractor replaces
//! delimited notation text inside it with [`NotationContainer`] nodes.

/// Markdown-like document reader.
pub mod document;
/// HTML emitter.
pub mod emit;

use serde::{Deserialize, Serialize};

use crate::notation::{IconNode, Segment};
use combo_notation_diagnostics::Span;

/// Presentation mode of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Colorized text.
    #[default]
    Text,
    /// Glyphs.
    Icon,
}

impl RenderMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Text => RenderMode::Icon,
            RenderMode::Icon => RenderMode::Text,
        }
    }
}

/// Kind of a top-level rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Prose paragraph.
    Paragraph,
    /// Block quote.
    Quote,
    /// One list item.
    ListItem,
    /// ATX heading of level 1 to 6.
    Heading(u8),
    /// Fenced code. Never scanned for notation.
    Code,
}

impl BlockKind {
    /// HTML tag for the block.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Quote => "blockquote",
            BlockKind::ListItem => "li",
            BlockKind::Heading(1) => "h1",
            BlockKind::Heading(2) => "h2",
            BlockKind::Heading(3) => "h3",
            BlockKind::Heading(4) => "h4",
            BlockKind::Heading(5) => "h5",
            BlockKind::Heading(_) => "h6",
            BlockKind::Code => "pre",
        }
    }
}

/// One rendered block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block kind.
    pub kind: BlockKind,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Source span of the block, when it came from a parsed document.
    pub span: Option<Span>,
}

impl Block {
    /// Create a block without a source span.
    pub fn new(kind: BlockKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            span: None,
        }
    }

    /// Paragraph holding a single text node.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, vec![Node::Text(text.into())])
    }

    /// Attach a source span (builder pattern).
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Notation containers in document order.
    pub fn containers(&self) -> Vec<&NotationContainer> {
        let mut out = Vec::new();
        collect_containers(&self.children, &mut out);
        out
    }

    /// Apply `f` to every notation container in document order.
    pub fn for_each_container_mut(&mut self, f: &mut impl FnMut(&mut NotationContainer)) {
        visit_containers_mut(&mut self.children, f);
    }

    /// Apply `f` to every mode toggle.
    pub fn for_each_toggle_mut(&mut self, f: &mut impl FnMut(&mut ModeToggle)) {
        visit_toggles_mut(&mut self.children, f);
    }

    /// Visible text of the block, as a reader would select it.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.push_text(&mut out);
        }
        out
    }
}

fn collect_containers<'a>(nodes: &'a [Node], out: &mut Vec<&'a NotationContainer>) {
    for node in nodes {
        match node {
            Node::Notation(c) => out.push(c),
            Node::Element { children, .. } => collect_containers(children, out),
            Node::Text(_) | Node::Toggle(_) => {}
        }
    }
}

fn visit_containers_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut NotationContainer)) {
    for node in nodes {
        match node {
            Node::Notation(c) => f(c),
            Node::Element { children, .. } => visit_containers_mut(children, f),
            Node::Text(_) | Node::Toggle(_) => {}
        }
    }
}

fn visit_toggles_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut ModeToggle)) {
    for node in nodes {
        match node {
            Node::Toggle(t) => f(t),
            Node::Element { children, .. } => visit_toggles_mut(children, f),
            Node::Text(_) | Node::Notation(_) => {}
        }
    }
}

/// A node inside a block.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Node {
    /// Plain text.
    Text(String),
    /// Inline element such as `code` or `em`.
    Element {
        /// Tag name.
        tag: String,
        /// Child nodes.
        children: Vec<Node>,
    },
    /// Extracted notation.
    Notation(NotationContainer),
    /// Button that switches the view between text and icon mode.
    Toggle(ModeToggle),
}

impl Node {
    /// Element with children.
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            children,
        }
    }

    /// Text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element { children, .. } => {
                for child in children {
                    child.push_text(out);
                }
            }
            Node::Notation(c) => out.push_str(&c.visible_text()),
            Node::Toggle(t) => out.push_str(t.label()),
        }
    }
}

/// The control that flips a view between text and icon mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeToggle {
    mode: RenderMode,
}

impl ModeToggle {
    /// A toggle reflecting `mode`.
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// Mode the view is currently in.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Sync with the view's mode.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Button caption: names the mode a click switches to.
    pub fn label(&self) -> &'static str {
        match self.mode {
            RenderMode::Text => "Icon Notation",
            RenderMode::Icon => "Text Notation",
        }
    }
}

/// What a notation container currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Extracted but not yet colorized.
    Raw,
    /// Colorized segments (or the missing-profile placeholder).
    Colored(Vec<Segment>),
    /// Glyphs.
    Icons(Vec<IconNode>),
}

/// An extracted notation and its current presentation.
///
/// The original payload text is captured when the container is created and
/// cannot be replaced afterwards; switching back from icons always restores
/// from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationContainer {
    text_mode: String,
    presentation: Presentation,
    warning: bool,
    span: Option<Span>,
}

impl NotationContainer {
    /// New container for payload `text` (delimiters already stripped).
    pub fn new(text: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            text_mode: text.into(),
            presentation: Presentation::Raw,
            warning: false,
            span,
        }
    }

    /// The original notation text.
    pub fn text_mode(&self) -> &str {
        &self.text_mode
    }

    /// Current presentation.
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Whether the container shows the missing-profile warning.
    pub fn is_warning(&self) -> bool {
        self.warning
    }

    /// Whether the container currently shows glyphs.
    pub fn is_iconized(&self) -> bool {
        matches!(self.presentation, Presentation::Icons(_))
    }

    /// Source span of the enclosing block.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Colored segments, when in colored mode.
    pub fn segments(&self) -> Option<&[Segment]> {
        match &self.presentation {
            Presentation::Colored(segments) => Some(segments),
            _ => None,
        }
    }

    /// Show colored segments. A placeholder segment raises the warning flag.
    pub fn set_colored(&mut self, segments: Vec<Segment>) {
        self.warning = segments
            .iter()
            .any(|s| matches!(s, Segment::MissingProfile));
        self.presentation = Presentation::Colored(segments);
    }

    /// Show glyphs.
    pub fn set_icons(&mut self, nodes: Vec<IconNode>) {
        self.presentation = Presentation::Icons(nodes);
    }

    /// Text a reader currently sees.
    pub fn visible_text(&self) -> String {
        match &self.presentation {
            Presentation::Raw => self.text_mode.clone(),
            Presentation::Colored(segments) => segments.iter().map(Segment::display_text).collect(),
            Presentation::Icons(nodes) => nodes
                .iter()
                .filter_map(|n| match n {
                    IconNode::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}
