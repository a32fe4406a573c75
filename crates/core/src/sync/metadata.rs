//! Where documents declare their profile.

use std::collections::BTreeMap;

use crate::dom::document::Document;

/// Answers "which profile does this document declare?".
pub trait MetadataSource {
    /// Profile id declared by `document`, or `None` when it declares none.
    fn profile_of(&self, document: &str) -> Option<String>;
}

/// In-memory document metadata, keyed by document id.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    key: String,
    documents: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new("profile")
    }
}

impl DocumentMetadata {
    /// Empty metadata reading the profile from field `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            documents: BTreeMap::new(),
        }
    }

    /// The field naming the profile.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Set one metadata field of `document`.
    pub fn set_field(&mut self, document: &str, field: &str, value: &str) {
        self.documents
            .entry(document.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Set the profile field of `document`.
    pub fn set_profile(&mut self, document: &str, profile: &str) {
        let key = self.key.clone();
        self.set_field(document, &key, profile);
    }

    /// Remove the profile field of `document`.
    pub fn clear_profile(&mut self, document: &str) {
        if let Some(fields) = self.documents.get_mut(document) {
            fields.remove(&self.key);
        }
    }

    /// Replace all fields of `document` with a parsed document's frontmatter.
    pub fn load_frontmatter(&mut self, document: &str, doc: &Document) {
        self.documents
            .insert(document.to_string(), doc.frontmatter.clone());
    }
}

impl MetadataSource for DocumentMetadata {
    fn profile_of(&self, document: &str) -> Option<String> {
        self.documents
            .get(document)?
            .get(&self.key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}
