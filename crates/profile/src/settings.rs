//! Plugin settings.

use serde::{Deserialize, Serialize};

use crate::{Profile, ProfileError};

/// User-facing settings, loaded from JSON. Missing fields take defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Profile used when there is no document context.
    pub selected_profile: String,
    /// Frontmatter key that names a document's profile.
    pub metadata_key: String,
    /// User-defined profiles.
    pub custom_profiles: Vec<Profile>,
    /// Delay before reacting to document metadata changes. `0` reacts at once.
    pub debounce_ms: u64,
    /// Path prefix for motion glyph images.
    pub icon_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selected_profile: "asw".into(),
            metadata_key: "profile".into(),
            custom_profiles: Vec::new(),
            debounce_ms: 0,
            icon_base: "icons/".into(),
        }
    }
}

impl Settings {
    /// Check every field, including each custom profile.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.metadata_key.trim().is_empty() {
            return Err(ProfileError::InvalidField {
                field: "metadata_key".into(),
                reason: "must not be empty".into(),
            });
        }
        for (i, profile) in self.custom_profiles.iter().enumerate() {
            profile.validate().map_err(|e| match e {
                ProfileError::InvalidField { field, reason } => ProfileError::InvalidField {
                    field: format!("custom_profiles[{i}].{field}"),
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Load and validate settings from a JSON string.
pub fn load_settings_from_str(s: &str) -> Result<Settings, ProfileError> {
    let settings: Settings = serde_json::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let s = load_settings_from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.selected_profile, "asw");
        assert_eq!(s.metadata_key, "profile");
        assert_eq!(s.debounce_ms, 0);
    }

    #[test]
    fn debounce_and_custom_profiles() {
        let s = load_settings_from_str(
            r##"{
                "debounce_ms": 150,
                "custom_profiles": [
                    {"id": "mine", "name": "Mine", "colors": {"LP": "#123456"}}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(s.debounce_ms, 150);
        assert_eq!(s.custom_profiles[0].color_of("LP"), Some("#123456"));
    }

    #[test]
    fn invalid_custom_profile_field_is_prefixed() {
        let err = load_settings_from_str(
            r#"{"custom_profiles": [{"id": "mine", "name": "Mine", "colors": {"LP": "blue"}}]}"#,
        )
        .unwrap_err();
        assert!(
            matches!(&err, ProfileError::InvalidField { field, .. } if field == "custom_profiles[0].colors.LP"),
            "{err}"
        );
    }

    #[test]
    fn blank_metadata_key_rejected() {
        let err = load_settings_from_str(r#"{"metadata_key": ""}"#).unwrap_err();
        assert!(err.to_string().contains("metadata_key"), "{err}");
    }
}
