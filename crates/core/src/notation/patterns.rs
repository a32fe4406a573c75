//! Pattern registry: the ordered token matchers built from one profile.
//!
//! A registry is an immutable snapshot. It is rebuilt whenever the profile
//! changes and never mutated in place, so every stage of a render sees the
//! same matchers and colors.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use combo_notation_diagnostics::{Diagnostic, codes};
use combo_notation_profile::Profile;

use super::glyphs::{MOTION_GLYPHS, MotionGlyph};

/// Fill color for button labels when the profile does not set one.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Compiled-size ceiling for a single input matcher.
const MATCHER_SIZE_LIMIT: usize = 1 << 20;

/// Why an input label could not be turned into a matcher.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The label contains characters other than ASCII letters, digits, and `_`.
    #[error("input label `{label}` must contain only ASCII letters, digits, or underscores")]
    InvalidLabel {
        /// The rejected label.
        label: String,
    },
    /// The regex engine refused the generated pattern.
    #[error("could not build matcher for input `{label}`: {source}")]
    Compile {
        /// The input label.
        label: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Diagnostic code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            PatternError::InvalidLabel { .. } => codes::INVALID_INPUT_LABEL,
            PatternError::Compile { .. } => codes::PATTERN_COMPILE_FAILED,
        }
    }

    /// The offending label.
    pub fn label(&self) -> &str {
        match self {
            PatternError::InvalidLabel { label } | PatternError::Compile { label, .. } => label,
        }
    }

    /// Convert into a warning diagnostic attributed to `profile_id`.
    pub fn to_diagnostic(&self, profile_id: &str) -> Diagnostic {
        Diagnostic::warn(
            self.code(),
            format!("profile `{profile_id}`: {self}; input skipped"),
            None,
        )
        .with_context(BTreeMap::from([
            ("profile".to_string(), profile_id.to_string()),
            ("input".to_string(), self.label().to_string()),
        ]))
    }
}

/// Matcher for one profile input.
#[derive(Debug, Clone)]
pub struct InputPattern {
    /// Input label (e.g. `"HS"`).
    pub label: String,
    /// Display color.
    pub color: String,
    /// Declaration index among the profile's inputs.
    pub priority: usize,
    regex: Regex,
}

impl InputPattern {
    /// The compiled token matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// One registry entry, in priority order.
#[derive(Debug, Clone, Copy)]
pub enum PatternEntry<'a> {
    /// A fixed motion, direction, or modifier glyph.
    Motion(&'a MotionGlyph),
    /// A profile input.
    Input(&'a InputPattern),
}

/// Ordered matchers for one profile: fixed motions first, then the profile's
/// inputs in declaration order.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    profile_id: String,
    inputs: Vec<InputPattern>,
    text_color: String,
    diagnostics: Vec<Diagnostic>,
}

impl PatternRegistry {
    /// Build the registry for `profile`. Inputs whose labels cannot be
    /// compiled are skipped and reported through [`Self::diagnostics`].
    pub fn build(profile: &Profile) -> Self {
        let mut inputs = Vec::with_capacity(profile.colors.len());
        let mut diagnostics = Vec::new();
        for (priority, entry) in profile.colors.iter().enumerate() {
            match input_regex(&entry.label) {
                Ok(regex) => inputs.push(InputPattern {
                    label: entry.label.clone(),
                    color: entry.color.clone(),
                    priority,
                    regex,
                }),
                Err(err) => {
                    tracing::warn!(
                        profile = %profile.id,
                        input = %entry.label,
                        error = %err,
                        "skipping profile input"
                    );
                    diagnostics.push(err.to_diagnostic(&profile.id));
                }
            }
        }
        Self {
            profile_id: profile.id.clone(),
            inputs,
            text_color: profile
                .text_color
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            diagnostics,
        }
    }

    /// Id of the profile this registry was built from.
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Compiled profile inputs in priority order.
    pub fn inputs(&self) -> &[InputPattern] {
        &self.inputs
    }

    /// Fixed motion glyphs in priority order.
    pub fn motions(&self) -> &'static [MotionGlyph] {
        MOTION_GLYPHS
    }

    /// Every entry in priority order.
    pub fn entries(&self) -> impl Iterator<Item = PatternEntry<'_>> {
        MOTION_GLYPHS
            .iter()
            .map(PatternEntry::Motion)
            .chain(self.inputs.iter().map(PatternEntry::Input))
    }

    /// Fill color for button glyph labels.
    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    /// Warnings for inputs that were skipped.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Build the registry for `profile`.
pub fn build_patterns(profile: &Profile) -> PatternRegistry {
    PatternRegistry::build(profile)
}

/// Whether `label` can be embedded in a matcher.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Token matcher for input `label`.
///
/// Accepts an optional positional prefix (`2`, `236`, `j.`, `cr.`), the
/// label itself or the bracketed `[label]`, and an optional repeat count
/// `(n)`. The token must end at a non-word character or end of text. The
/// leading boundary is enforced by the caller, since the engine has no
/// lookbehind.
fn input_regex(label: &str) -> Result<Regex, PatternError> {
    if !is_valid_label(label) {
        return Err(PatternError::InvalidLabel {
            label: label.to_string(),
        });
    }
    let pattern = format!(
        r"(?:[0-9]*[a-z]*\.[0-9]*|[0-9]+[a-z]*)?(?:\[{label}\](?:\([0-9]+\))?\B|{label}\b(?:\([0-9]+\)\B)?)"
    );
    RegexBuilder::new(&pattern)
        .size_limit(MATCHER_SIZE_LIMIT)
        .build()
        .map_err(|source| PatternError::Compile {
            label: label.to_string(),
            source,
        })
}
