//! In-memory profile store with copy-on-write snapshots.
//!
//! Renders hold an `Arc<Profile>` snapshot for their whole duration. Every
//! edit builds a new profile value and swaps it in, so a snapshot taken
//! before the edit never sees a half-applied change.

use std::sync::Arc;

use crate::{BUILTIN_IDS, Profile, ProfileError, Settings, builtin_profiles, is_hex_color};

#[derive(Debug, Clone)]
struct Entry {
    profile: Arc<Profile>,
    builtin: bool,
}

/// Built-in and user-defined profiles, in display order.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    entries: Vec<Entry>,
    revision: u64,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// A store holding only the built-in profiles.
    pub fn new() -> Self {
        let entries = builtin_profiles()
            .into_iter()
            .map(|p| Entry {
                profile: Arc::new(p),
                builtin: true,
            })
            .collect();
        Self {
            entries,
            revision: 0,
        }
    }

    /// Built-ins followed by the custom profiles from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ProfileError> {
        let mut store = Self::new();
        for profile in &settings.custom_profiles {
            store.insert(profile.clone())?;
        }
        Ok(store)
    }

    /// Monotonic counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current snapshot of profile `id`.
    pub fn snapshot(&self, id: &str) -> Option<Arc<Profile>> {
        self.entry(id).map(|e| Arc::clone(&e.profile))
    }

    /// Whether a profile with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    /// Whether `id` names a built-in profile.
    pub fn is_builtin(&self, id: &str) -> bool {
        self.entry(id).is_some_and(|e| e.builtin)
    }

    /// Profile ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.profile.id.as_str())
    }

    /// Profiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Profile>> {
        self.entries.iter().map(|e| &e.profile)
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Add a user-defined profile.
    pub fn insert(&mut self, profile: Profile) -> Result<Arc<Profile>, ProfileError> {
        profile.validate()?;
        if self.contains(&profile.id) {
            return Err(ProfileError::DuplicateProfile(profile.id));
        }
        let profile = Arc::new(profile);
        self.entries.push(Entry {
            profile: Arc::clone(&profile),
            builtin: false,
        });
        self.revision += 1;
        tracing::debug!(profile = %profile.id, "profile added");
        Ok(profile)
    }

    /// Copy profile `from` into a new, editable profile.
    pub fn duplicate(
        &mut self,
        from: &str,
        new_id: &str,
        name: &str,
    ) -> Result<Arc<Profile>, ProfileError> {
        let source = self
            .snapshot(from)
            .ok_or_else(|| ProfileError::UnknownProfile(from.to_string()))?;
        let mut copy = (*source).clone();
        copy.id = new_id.to_string();
        copy.name = name.to_string();
        if copy.default_colors.is_none() {
            copy.default_colors = Some(copy.colors.clone());
        }
        self.insert(copy)
    }

    /// Change the display name.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), ProfileError> {
        if name.trim().is_empty() {
            return Err(ProfileError::InvalidField {
                field: "name".into(),
                reason: "must not be empty".into(),
            });
        }
        self.edit(id, |p| {
            p.name = name.to_string();
            Ok(())
        })
    }

    /// Recolor a declared input.
    pub fn set_color(&mut self, id: &str, input: &str, color: &str) -> Result<(), ProfileError> {
        check_color(input, color)?;
        self.edit(id, |p| {
            if !p.colors.contains(input) {
                return Err(unknown_input(p, input));
            }
            p.colors.set(input, color);
            Ok(())
        })
    }

    /// Declare a new input at the lowest priority. Its color also becomes
    /// its default unless a default is already recorded.
    pub fn add_input(
        &mut self,
        id: &str,
        input: &str,
        color: &str,
        description: Option<&str>,
    ) -> Result<(), ProfileError> {
        if input.is_empty() {
            return Err(ProfileError::InvalidField {
                field: "colors".into(),
                reason: "input label must not be empty".into(),
            });
        }
        check_color(input, color)?;
        self.edit(id, |p| {
            if p.colors.contains(input) {
                return Err(ProfileError::DuplicateInput {
                    profile: p.id.clone(),
                    input: input.to_string(),
                });
            }
            p.colors.set(input, color);
            let defaults = p.default_colors.get_or_insert_with(Default::default);
            if !defaults.contains(input) {
                defaults.set(input, color);
            }
            if let Some(desc) = description {
                p.descriptions.insert(input.to_string(), desc.to_string());
            }
            Ok(())
        })
    }

    /// Remove a declared input along with its description and default.
    pub fn remove_input(&mut self, id: &str, input: &str) -> Result<(), ProfileError> {
        self.edit(id, |p| {
            if p.colors.remove(input).is_none() {
                return Err(unknown_input(p, input));
            }
            p.descriptions.remove(input);
            if let Some(defaults) = &mut p.default_colors {
                defaults.remove(input);
            }
            Ok(())
        })
    }

    /// Restore one input's color from its recorded default.
    pub fn reset_color(&mut self, id: &str, input: &str) -> Result<(), ProfileError> {
        self.edit(id, |p| {
            if !p.colors.contains(input) {
                return Err(unknown_input(p, input));
            }
            let default = p
                .default_color_of(input)
                .map(str::to_string)
                .ok_or_else(|| ProfileError::NoDefaultColor {
                    profile: p.id.clone(),
                    input: input.to_string(),
                })?;
            p.colors.set(input, default);
            Ok(())
        })
    }

    /// Restore every input that has a recorded default.
    pub fn reset_all(&mut self, id: &str) -> Result<(), ProfileError> {
        self.edit(id, |p| {
            let Some(defaults) = p.default_colors.clone() else {
                return Ok(());
            };
            for entry in &defaults {
                if p.colors.contains(&entry.label) {
                    p.colors.set(entry.label.as_str(), entry.color.as_str());
                }
            }
            Ok(())
        })
    }

    /// Delete a user-defined profile, returning its last snapshot.
    pub fn remove(&mut self, id: &str) -> Result<Arc<Profile>, ProfileError> {
        let idx = self.position_mut_checked(id)?;
        let entry = self.entries.remove(idx);
        self.revision += 1;
        tracing::debug!(profile = %id, "profile removed");
        Ok(entry.profile)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.profile.id == id)
    }

    fn position_mut_checked(&self, id: &str) -> Result<usize, ProfileError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.profile.id == id)
            .ok_or_else(|| ProfileError::UnknownProfile(id.to_string()))?;
        if self.entries[idx].builtin {
            return Err(ProfileError::BuiltinImmutable(id.to_string()));
        }
        Ok(idx)
    }

    /// Apply `f` to a private copy and publish it only if `f` succeeds.
    fn edit<F>(&mut self, id: &str, f: F) -> Result<(), ProfileError>
    where
        F: FnOnce(&mut Profile) -> Result<(), ProfileError>,
    {
        let idx = self.position_mut_checked(id)?;
        let mut draft = (*self.entries[idx].profile).clone();
        f(&mut draft)?;
        self.entries[idx].profile = Arc::new(draft);
        self.revision += 1;
        tracing::debug!(profile = %id, revision = self.revision, "profile edited");
        Ok(())
    }
}

fn check_color(input: &str, color: &str) -> Result<(), ProfileError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(ProfileError::InvalidField {
            field: format!("colors.{input}"),
            reason: format!("`{color}` is not a #RGB or #RRGGBB color"),
        })
    }
}

fn unknown_input(p: &Profile, input: &str) -> ProfileError {
    ProfileError::UnknownInput {
        profile: p.id.clone(),
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_copy() -> ProfileStore {
        let mut store = ProfileStore::new();
        store.duplicate("asw", "mine", "Mine").unwrap();
        store
    }

    #[test]
    fn new_store_has_builtins_in_order() {
        let store = ProfileStore::new();
        assert_eq!(store.ids().collect::<Vec<_>>(), BUILTIN_IDS);
        assert!(store.is_builtin("trd"));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn builtins_reject_every_mutation() {
        let mut store = ProfileStore::new();
        assert!(matches!(
            store.set_color("asw", "A", "#000000"),
            Err(ProfileError::BuiltinImmutable(_))
        ));
        assert!(matches!(store.rename("asw", "x"), Err(ProfileError::BuiltinImmutable(_))));
        assert!(matches!(store.remove("alt"), Err(ProfileError::BuiltinImmutable(_))));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn duplicate_copies_colors_and_is_editable() {
        let mut store = store_with_copy();
        assert!(!store.is_builtin("mine"));
        store.set_color("mine", "A", "#000000").unwrap();
        assert_eq!(store.snapshot("mine").unwrap().color_of("A"), Some("#000000"));
        assert_eq!(store.snapshot("asw").unwrap().color_of("A"), Some("#DE1616"));
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut store = store_with_copy();
        assert!(matches!(
            store.duplicate("asw", "mine", "Again"),
            Err(ProfileError::DuplicateProfile(id)) if id == "mine"
        ));
    }

    #[test]
    fn snapshot_survives_edit() {
        let mut store = store_with_copy();
        let before = store.snapshot("mine").unwrap();
        store.set_color("mine", "A", "#000000").unwrap();
        assert_eq!(before.color_of("A"), Some("#DE1616"));
        let after = store.snapshot("mine").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn failed_edit_changes_nothing() {
        let mut store = store_with_copy();
        let rev = store.revision();
        let before = store.snapshot("mine").unwrap();
        assert!(matches!(
            store.set_color("mine", "ZZ", "#000000"),
            Err(ProfileError::UnknownInput { .. })
        ));
        assert!(store.set_color("mine", "A", "nope").is_err());
        assert_eq!(store.revision(), rev);
        assert!(Arc::ptr_eq(&before, &store.snapshot("mine").unwrap()));
    }

    #[test]
    fn add_input_appends_and_records_default() {
        let mut store = store_with_copy();
        store
            .add_input("mine", "EX", "#123456", Some("Extra"))
            .unwrap();
        let p = store.snapshot("mine").unwrap();
        assert_eq!(p.colors.labels().last(), Some("EX"));
        assert_eq!(p.default_color_of("EX"), Some("#123456"));
        assert_eq!(p.description_of("EX"), Some("Extra"));
        assert!(matches!(
            store.add_input("mine", "EX", "#000000", None),
            Err(ProfileError::DuplicateInput { .. })
        ));
    }

    #[test]
    fn reset_color_and_reset_all_restore_defaults() {
        let mut store = store_with_copy();
        store.set_color("mine", "A", "#000000").unwrap();
        store.set_color("mine", "B", "#000000").unwrap();
        store.reset_color("mine", "A").unwrap();
        let p = store.snapshot("mine").unwrap();
        assert_eq!(p.color_of("A"), Some("#DE1616"));
        assert_eq!(p.color_of("B"), Some("#000000"));
        store.reset_all("mine").unwrap();
        assert_eq!(store.snapshot("mine").unwrap().color_of("B"), Some("#1F8CCC"));
    }

    #[test]
    fn reset_without_default_fails() {
        let mut store = ProfileStore::new();
        store
            .insert(Profile::new("bare", "Bare").with_input("X", "#111111"))
            .unwrap();
        assert!(matches!(
            store.reset_color("bare", "X"),
            Err(ProfileError::NoDefaultColor { .. })
        ));
        store.reset_all("bare").unwrap();
    }

    #[test]
    fn remove_input_drops_description_and_default() {
        let mut store = store_with_copy();
        store.remove_input("mine", "HS").unwrap();
        let p = store.snapshot("mine").unwrap();
        assert!(!p.colors.contains("HS"));
        assert!(p.description_of("HS").is_none());
        assert!(p.default_color_of("HS").is_none());
    }

    #[test]
    fn remove_profile() {
        let mut store = store_with_copy();
        let last = store.remove("mine").unwrap();
        assert_eq!(last.id, "mine");
        assert!(!store.contains("mine"));
        assert!(matches!(store.remove("mine"), Err(ProfileError::UnknownProfile(_))));
    }

    #[test]
    fn from_settings_adds_custom_profiles() {
        let mut settings = Settings::default();
        settings
            .custom_profiles
            .push(Profile::new("c", "Custom").with_input("LP", "#123456"));
        let store = ProfileStore::from_settings(&settings).unwrap();
        assert_eq!(store.len(), 4);
        assert!(!store.is_builtin("c"));
    }
}
