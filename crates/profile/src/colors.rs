//! Ordered `input label → color` mapping.
//!
//! Declaration order is significant: later stages resolve overlapping token
//! matches in favour of the input declared first. JSON objects are read and
//! written in document order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One declared input and its display color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColor {
    /// Input label as written in notation (e.g. `"HS"`).
    pub label: String,
    /// CSS hex color (e.g. `"#DE1616"`).
    pub color: String,
}

/// Insertion-ordered mapping from input label to color.
///
/// Invariant: every label appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputColors {
    entries: Vec<InputColor>,
}

impl InputColors {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared inputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no inputs are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color for `label`, if declared.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.color.as_str())
    }

    /// Whether `label` is declared.
    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Declaration index of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }

    /// Set the color of `label`, keeping its position. Appends when the
    /// label is new. Returns the previous color.
    pub fn set(&mut self, label: impl Into<String>, color: impl Into<String>) -> Option<String> {
        let label = label.into();
        let color = color.into();
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => Some(std::mem::replace(&mut entry.color, color)),
            None => {
                self.entries.push(InputColor { label, color });
                None
            }
        }
    }

    /// Remove `label`, returning its color.
    pub fn remove(&mut self, label: &str) -> Option<String> {
        let idx = self.position(label)?;
        Some(self.entries.remove(idx).color)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, InputColor> {
        self.entries.iter()
    }

    /// Iterate labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

impl<'a> IntoIterator for &'a InputColors {
    type Item = &'a InputColor;
    type IntoIter = std::slice::Iter<'a, InputColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: Into<String>, C: Into<String>> FromIterator<(L, C)> for InputColors {
    /// Later duplicates overwrite the color of the first occurrence.
    fn from_iter<I: IntoIterator<Item = (L, C)>>(iter: I) -> Self {
        let mut colors = InputColors::new();
        for (label, color) in iter {
            colors.set(label, color);
        }
        colors
    }
}

impl Serialize for InputColors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.label, &entry.color)?;
        }
        map.end()
    }
}

struct InputColorsVisitor;

impl<'de> Visitor<'de> for InputColorsVisitor {
    type Value = InputColors;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping input labels to colors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut colors = InputColors::new();
        while let Some((label, color)) = access.next_entry::<String, String>()? {
            if colors.contains(&label) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate input label `{label}`"
                )));
            }
            colors.entries.push(InputColor { label, color });
        }
        Ok(colors)
    }
}

impl<'de> Deserialize<'de> for InputColors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(InputColorsVisitor)
    }
}
