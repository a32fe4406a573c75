/// Token colorizer: candidate matching and overlap resolution.
pub mod colorize;
/// `=:payload:=` extraction.
pub mod extract;
/// Motion glyph table and button glyph rendering.
pub mod glyphs;
/// Glyph substitution.
pub mod iconize;
/// Per-profile token matchers.
pub mod patterns;
/// Colorized segment type.
pub mod segment;

pub use colorize::{MatchRange, colorize, find_matches, resolve_overlaps};
pub use extract::{Delimited, extract, find_delimited};
pub use glyphs::{AliasKind, DisplayClass, MOTION_GLYPHS, MotionGlyph};
pub use iconize::{IconNode, iconize, iconize_segments};
pub use patterns::{InputPattern, PatternEntry, PatternError, PatternRegistry, build_patterns};
pub use segment::{MISSING_PROFILE_PLACEHOLDER, Segment, plain_text};
