//! Shared test helpers for `combo_notation_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;

use combo_notation_core::notation::{IconNode, PatternRegistry, Segment};
use combo_notation_profile::ProfileStore;

/// Built-in profiles, loaded once per test binary.
pub static STORE: LazyLock<ProfileStore> = LazyLock::new(ProfileStore::new);

/// Registry for a built-in profile id.
pub fn registry(id: &str) -> PatternRegistry {
    let profile = STORE
        .snapshot(id)
        .unwrap_or_else(|| panic!("no built-in profile `{id}`"));
    PatternRegistry::build(&profile)
}

// ─── Segment helpers ─────────────────────────────────────────────────────────

/// `(text, label)` pairs of the input segments, in order.
#[allow(dead_code)]
pub fn input_labels(segments: &[Segment]) -> Vec<(String, String)> {
    segments
        .iter()
        .filter_map(|s| match s {
            Segment::Input { text, label, .. } => Some((text.clone(), label.clone())),
            _ => None,
        })
        .collect()
}

/// Colors of the input segments, in order.
#[allow(dead_code)]
pub fn input_colors(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|s| s.color().map(str::to_string))
        .collect()
}

// ─── Icon helpers ────────────────────────────────────────────────────────────

/// Compact description of icon nodes: glyph names, or `'text'` for literals.
#[allow(dead_code)]
pub fn describe_icons(nodes: &[IconNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| match n {
            IconNode::Text { text, .. } => format!("'{text}'"),
            other => other.glyph_name().unwrap_or_default().to_string(),
        })
        .collect()
}
