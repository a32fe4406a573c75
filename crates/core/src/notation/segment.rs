use serde::{Deserialize, Serialize};

/// Text shown in place of a notation whose document has no usable profile.
pub const MISSING_PROFILE_PLACEHOLDER: &str = "[ No notation profile in frontmatter ]";

/// One piece of a colorized notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Segment {
    /// Literal text between recognized tokens.
    Text {
        /// The literal text.
        text: String,
    },
    /// A recognized input token, including any prefix or repeat count.
    Input {
        /// Matched source text (e.g. `"j.C"`).
        text: String,
        /// Profile input label (e.g. `"C"`).
        label: String,
        /// Display color of the input.
        color: String,
    },
    /// Placeholder shown when no profile applies. Carries no source text.
    MissingProfile,
}

impl Segment {
    /// Literal segment.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    /// Source text this segment covers. Empty for the placeholder.
    pub fn source_text(&self) -> &str {
        match self {
            Segment::Text { text } | Segment::Input { text, .. } => text,
            Segment::MissingProfile => "",
        }
    }

    /// Text a reader sees for this segment.
    pub fn display_text(&self) -> &str {
        match self {
            Segment::MissingProfile => MISSING_PROFILE_PLACEHOLDER,
            other => other.source_text(),
        }
    }

    /// Input color, for [`Segment::Input`].
    pub fn color(&self) -> Option<&str> {
        match self {
            Segment::Input { color, .. } => Some(color),
            _ => None,
        }
    }

    /// Input label, for [`Segment::Input`].
    pub fn label(&self) -> Option<&str> {
        match self {
            Segment::Input { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Concatenate the source text of `segments`, dropping all styling.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::source_text).collect()
}
