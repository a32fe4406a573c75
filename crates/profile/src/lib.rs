//! Notation profile definitions and validation for combo-notation.
//!
//! A [`Profile`] names an ordered set of input labels and their colors.
//! Declaration order is significant: it is the priority order the token
//! colorizer uses when two inputs match overlapping text.

#![warn(missing_docs)]

mod builtin;
mod colors;
mod settings;
mod store;

pub use builtin::{BUILTIN_IDS, builtin_profiles};
pub use colors::{InputColor, InputColors};
pub use settings::{Settings, load_settings_from_str};
pub use store::ProfileStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur when loading, validating, or editing a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// JSON deserialization failed.
    #[error("invalid profile JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is malformed.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },

    /// An input label is already declared in the profile.
    #[error("input `{input}` is already declared in profile `{profile}`")]
    DuplicateInput {
        /// Profile id.
        profile: String,
        /// The duplicated input label.
        input: String,
    },

    /// The input label is not declared in the profile.
    #[error("profile `{profile}` has no input `{input}`")]
    UnknownInput {
        /// Profile id.
        profile: String,
        /// The missing input label.
        input: String,
    },

    /// No default color is recorded for the input, so it cannot be reset.
    #[error("profile `{profile}` has no default color for input `{input}`")]
    NoDefaultColor {
        /// Profile id.
        profile: String,
        /// The input label.
        input: String,
    },

    /// No profile with this id exists in the store.
    #[error("unknown profile `{0}`")]
    UnknownProfile(String),

    /// A profile with this id already exists in the store.
    #[error("profile `{0}` already exists")]
    DuplicateProfile(String),

    /// Built-in profiles cannot be edited or removed.
    #[error("built-in profile `{0}` cannot be modified; duplicate it first")]
    BuiltinImmutable(String),
}

/// A notation profile: which input labels exist and how each is colored.
///
/// # Example
/// ```
/// let profile = combo_notation_profile::Profile::new("sf", "Street Fighter")
///     .with_input("LP", "#1F8CCC")
///     .with_input("HP", "#DE1616");
/// assert_eq!(profile.color_of("HP"), Some("#DE1616"));
/// assert_eq!(profile.colors.labels().collect::<Vec<_>>(), ["LP", "HP"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Stable identifier referenced from document metadata (e.g. `"asw"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ordered `label → color` mapping. Order is pattern priority.
    #[serde(default)]
    pub colors: InputColors,
    /// Optional human-readable description per input.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub descriptions: BTreeMap<String, String>,
    /// Colors restored by per-input reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_colors: Option<InputColors>,
    /// Color for the label text drawn inside button glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Profile {
    /// Create an empty profile.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            colors: InputColors::new(),
            descriptions: BTreeMap::new(),
            default_colors: None,
            text_color: None,
        }
    }

    /// Declare an input (builder pattern). Re-declaring a label recolors it
    /// in place.
    pub fn with_input(mut self, label: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.set(label, color);
        self
    }

    /// Color of `label`, if declared.
    pub fn color_of(&self, label: &str) -> Option<&str> {
        self.colors.get(label)
    }

    /// Description of `label`, if any.
    pub fn description_of(&self, label: &str) -> Option<&str> {
        self.descriptions.get(label).map(String::as_str)
    }

    /// Default color of `label`, if one was recorded.
    pub fn default_color_of(&self, label: &str) -> Option<&str> {
        self.default_colors.as_ref()?.get(label)
    }

    /// Check structural invariants. Input label *shape* is not checked here;
    /// labels that cannot become token matchers are skipped at render time.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty"));
        }
        if self.id.chars().any(char::is_whitespace) {
            return Err(invalid("id", format!("`{}` contains whitespace", self.id)));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        for entry in &self.colors {
            if entry.label.is_empty() {
                return Err(invalid("colors", "input label must not be empty"));
            }
            check_color(&format!("colors.{}", entry.label), &entry.color)?;
        }
        if let Some(defaults) = &self.default_colors {
            for entry in defaults {
                if !self.colors.contains(&entry.label) {
                    return Err(invalid(
                        "default_colors",
                        format!("`{}` is not a declared input", entry.label),
                    ));
                }
                check_color(&format!("default_colors.{}", entry.label), &entry.color)?;
            }
        }
        if let Some(text_color) = &self.text_color {
            check_color("text_color", text_color)?;
        }
        Ok(())
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ProfileError {
    ProfileError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_color(field: &str, color: &str) -> Result<(), ProfileError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("`{color}` is not a #RGB or #RRGGBB color"),
        ))
    }
}

/// Whether `s` is a CSS hex color of the form `#RGB` or `#RRGGBB`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Load and validate a profile from a JSON string.
///
/// Parses the JSON into a [`Profile`] and checks that ids are present, every
/// color is a hex color, and default colors only name declared inputs.
pub fn load_profile_from_str(s: &str) -> Result<Profile, ProfileError> {
    let profile: Profile = serde_json::from_str(s)?;
    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_valid_profile() {
        let json = r##"{
            "id": "sf6",
            "name": "Street Fighter 6",
            "colors": { "LP": "#1F8CCC", "MP": "#E8982C", "HP": "#DE1616" },
            "descriptions": { "LP": "Light Punch" },
            "default_colors": { "LP": "#1F8CCC" },
            "text_color": "#000"
        }"##;
        let p = load_profile_from_str(json).unwrap();
        assert_eq!(p.id, "sf6");
        assert_eq!(p.colors.labels().collect::<Vec<_>>(), ["LP", "MP", "HP"]);
        assert_eq!(p.description_of("LP"), Some("Light Punch"));
        assert_eq!(p.default_color_of("LP"), Some("#1F8CCC"));
        assert_eq!(p.default_color_of("HP"), None);
        assert_eq!(p.text_color.as_deref(), Some("#000"));
    }

    #[test]
    fn load_minimal_profile() {
        let p = load_profile_from_str(r#"{"id": "empty", "name": "Empty"}"#).unwrap();
        assert!(p.colors.is_empty());
        assert!(p.descriptions.is_empty());
        assert!(p.default_colors.is_none());
    }

    #[test]
    fn load_invalid_color() {
        let err = load_profile_from_str(r#"{"id": "x", "name": "X", "colors": {"A": "red"}}"#)
            .unwrap_err();
        assert!(
            matches!(&err, ProfileError::InvalidField { field, .. } if field == "colors.A"),
            "{err}"
        );
    }

    #[test]
    fn load_duplicate_input_is_json_error() {
        let err = load_profile_from_str(
            r##"{"id": "x", "name": "X", "colors": {"A": "#000000", "A": "#FFFFFF"}}"##,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidJson(_)), "{err}");
    }

    #[test]
    fn load_default_for_undeclared_input() {
        let err = load_profile_from_str(
            r##"{"id": "x", "name": "X", "colors": {"A": "#000000"}, "default_colors": {"B": "#000000"}}"##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`B` is not a declared input"), "{err}");
    }

    #[test]
    fn load_rejects_blank_id_and_name() {
        let err = load_profile_from_str(r#"{"id": " ", "name": "X"}"#).unwrap_err();
        assert!(matches!(&err, ProfileError::InvalidField { field, .. } if field == "id"));
        let err = load_profile_from_str(r#"{"id": "x", "name": ""}"#).unwrap_err();
        assert!(matches!(&err, ProfileError::InvalidField { field, .. } if field == "name"));
    }

    #[test]
    fn odd_labels_load_fine() {
        // Label shape is checked when building matchers, not here.
        let p = load_profile_from_str(r##"{"id": "x", "name": "X", "colors": {"A+B": "#123"}}"##)
            .unwrap();
        assert!(p.colors.contains("A+B"));
    }

    #[test]
    fn hex_color_forms() {
        assert!(is_hex_color("#abc"));
        assert!(is_hex_color("#DE1616"));
        assert!(!is_hex_color("DE1616"));
        assert!(!is_hex_color("#DE16"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn serialize_omits_empty_optionals() {
        let p = Profile::new("x", "X").with_input("A", "#000000");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r##"{"id":"x","name":"X","colors":{"A":"#000000"}}"##);
    }
}
