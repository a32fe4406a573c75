//! Combo notation core library.
//!
//! Recognizes `=:...:=` fighting-game notation inside rendered document
//! blocks, colorizes input tokens by the document's profile, and swaps
//! colored text for glyphs on request. The main entry points are
//! [`render_notations`] for a single block, [`render_document`] for a whole
//! source file, and [`Synchronizer`] for hosts that keep live views.

#![warn(missing_docs)]

/// Host block model, document reader, and HTML emitter.
pub mod dom;
/// Notation extraction, colorizing, and iconizing.
pub mod notation;
/// Block and document render pipeline.
pub mod render;
/// Per-view mode and profile synchronization.
pub mod sync;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Block model
pub use dom::document::{Document, parse_document};
pub use dom::emit::{EmitConfig, emit_blocks, emit_html};
pub use dom::{Block, BlockKind, ModeToggle, Node, NotationContainer, Presentation, RenderMode};

// Notation
pub use notation::{IconNode, PatternRegistry, Segment, colorize, iconize, iconize_segments};

// Render pipeline
pub use render::{
    ProfileLookup, RenderOptions, RenderReport, RenderedDocument, render_document,
    render_notations,
};

// Synchronizer
pub use sync::{DocumentMetadata, MetadataSource, SyncEvent, Synchronizer, View, ViewId};

// Diagnostics (re-exported from the diagnostics crate)
pub use combo_notation_diagnostics::{Diagnostic, Severity, Span, codes};
