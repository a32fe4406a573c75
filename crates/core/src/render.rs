//! Render pipeline.
//!
//! [`render_notations`] is the per-block entry point a host calls after it
//! renders a block: extract notation, then colorize each new container
//! against the resolved profile. The block-level helpers below it are what
//! mode toggles and profile changes use to re-render existing blocks.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dom::document::Document;
use crate::dom::{Block, Presentation, RenderMode};
use crate::notation::{PatternRegistry, Segment, colorize, extract, iconize_segments};
use combo_notation_diagnostics::{Diagnostic, Severity, codes};
use combo_notation_profile::ProfileStore;

/// The profile a block renders against.
#[derive(Debug, Clone, Copy)]
pub enum ProfileLookup<'a> {
    /// A usable profile.
    Ready(&'a PatternRegistry),
    /// The document declares no profile.
    Missing,
    /// The document names a profile the store does not have.
    Unknown(&'a str),
}

impl<'a> ProfileLookup<'a> {
    /// The registry, when a profile is available.
    pub fn registry(&self) -> Option<&'a PatternRegistry> {
        match self {
            ProfileLookup::Ready(registry) => Some(registry),
            _ => None,
        }
    }
}

/// Result of rendering one block or document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    /// Notation containers rendered.
    pub notations: usize,
    /// Diagnostics produced along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderReport {
    /// Whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, Severity::Error))
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: RenderReport) {
        self.notations += other.notations;
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Extract notation in `block` and colorize every container that has not
/// been rendered yet.
///
/// Never fails: without a usable profile each container shows the
/// missing-profile placeholder and the report carries one warning.
pub fn render_notations(block: &mut Block, profile: ProfileLookup<'_>) -> RenderReport {
    extract(block);
    let mut rendered = 0;
    block.for_each_container_mut(&mut |c| {
        if matches!(c.presentation(), Presentation::Raw) {
            c.set_colored(colorize_or_placeholder(c.text_mode(), profile));
            rendered += 1;
        }
    });

    let mut report = RenderReport {
        notations: rendered,
        diagnostics: Vec::new(),
    };
    if rendered > 0
        && let Some(d) = profile_diagnostic(profile, block)
    {
        report.diagnostics.push(d);
    }
    report
}

fn colorize_or_placeholder(text: &str, profile: ProfileLookup<'_>) -> Vec<Segment> {
    match profile.registry() {
        Some(registry) => colorize(text, registry),
        None => vec![Segment::MissingProfile],
    }
}

fn profile_diagnostic(profile: ProfileLookup<'_>, block: &Block) -> Option<Diagnostic> {
    let d = match profile {
        ProfileLookup::Ready(_) => return None,
        ProfileLookup::Missing => Diagnostic::warn(
            codes::MISSING_PROFILE,
            "document declares no notation profile; notations show a placeholder",
            block.span,
        ),
        ProfileLookup::Unknown(id) => Diagnostic::warn(
            codes::UNKNOWN_PROFILE,
            format!("unknown notation profile `{id}`; notations show a placeholder"),
            block.span,
        )
        .with_context(BTreeMap::from([("profile".to_string(), id.to_string())])),
    };
    Some(d)
}

/// Re-colorize every container from its original text. Used when leaving
/// icon mode and when the profile changes.
pub fn recolor_block(block: &mut Block, profile: ProfileLookup<'_>) -> usize {
    let mut n = 0;
    block.for_each_container_mut(&mut |c| {
        c.set_colored(colorize_or_placeholder(c.text_mode(), profile));
        n += 1;
    });
    n
}

/// Convert every colored container to glyphs. Containers already showing
/// glyphs and placeholder containers are left alone.
pub fn iconize_block(block: &mut Block, registry: &PatternRegistry) -> usize {
    let mut n = 0;
    block.for_each_container_mut(&mut |c| {
        if c.is_warning() || c.is_iconized() {
            return;
        }
        let icons = match c.segments() {
            Some(segments) => iconize_segments(segments, registry),
            None => iconize_segments(&colorize(c.text_mode(), registry), registry),
        };
        c.set_icons(icons);
        n += 1;
    });
    n
}

/// Point every mode toggle in `block` at `mode`.
pub fn set_block_mode(block: &mut Block, mode: RenderMode) {
    block.for_each_toggle_mut(&mut |t| t.set_mode(mode));
}

// ── Whole documents ─────────────────────────────────────────────────────

/// Options for [`render_document`].
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// Frontmatter key naming the profile.
    pub metadata_key: &'a str,
    /// Profile to use instead of the document's own.
    pub profile_override: Option<&'a str>,
    /// Mode to render in.
    pub mode: RenderMode,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            metadata_key: "profile",
            profile_override: None,
            mode: RenderMode::Text,
        }
    }
}

/// A fully rendered document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Rendered blocks.
    pub blocks: Vec<Block>,
    /// Profile id the document resolved to, if any.
    pub profile: Option<String>,
    /// Combined report.
    pub report: RenderReport,
}

/// Render every block of `doc` against the profile it declares.
pub fn render_document(
    doc: Document,
    store: &ProfileStore,
    options: &RenderOptions<'_>,
) -> RenderedDocument {
    let declared = options
        .profile_override
        .map(str::to_string)
        .or_else(|| doc.field(options.metadata_key).map(str::to_string));
    let snapshot = declared.as_deref().and_then(|id| store.snapshot(id));
    let registry = snapshot.as_deref().map(PatternRegistry::build);

    let lookup = match (&registry, declared.as_deref()) {
        (Some(registry), _) => ProfileLookup::Ready(registry),
        (None, Some(id)) => ProfileLookup::Unknown(id),
        (None, None) => ProfileLookup::Missing,
    };

    let mut report = RenderReport::default();
    if let Some(registry) = &registry {
        report.diagnostics.extend(registry.diagnostics().iter().cloned());
    }

    let mut blocks = doc.blocks;
    for block in &mut blocks {
        report.merge(render_notations(block, lookup));
        if options.mode == RenderMode::Icon
            && let Some(registry) = &registry
        {
            iconize_block(block, registry);
        }
        set_block_mode(block, options.mode);
    }

    tracing::debug!(
        profile = declared.as_deref().unwrap_or("<none>"),
        notations = report.notations,
        "rendered document"
    );

    RenderedDocument {
        blocks,
        profile: registry.map(|r| r.profile_id().to_string()),
        report,
    }
}
