//! Best-effort translation suggestions for keys missing from a catalog.
//!
//! The substitution table is always passed in explicitly, so callers (and
//! tests) decide which words are known. Suggestions are hints for a human
//! translator and are never written into a compiled catalog.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::{NoExpand, RegexBuilder};
use serde::Serialize;
use std::path::Path;

/// Marker prepended to keys nothing in the table could help with.
pub const DEFAULT_PLACEHOLDER_MARKER: &str = "[ترجمة مطلوبة]";

/// A suggested translation and how it was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Suggestion {
    /// The table has the whole key.
    Exact(String),
    /// One known word or phrase inside the key was substituted.
    Compound(String),
    /// Nothing matched; the key is returned with a marker.
    Placeholder(String),
}

impl Suggestion {
    pub fn text(&self) -> &str {
        match self {
            Suggestion::Exact(text) | Suggestion::Compound(text) | Suggestion::Placeholder(text) => {
                text
            }
        }
    }
}

/// Ordered word/phrase substitution table.
///
/// Order matters: the first entry found inside a compound key wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTable {
    words: IndexMap<String, String>,
    marker: String,
}

impl Default for SuggestionTable {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, String)>())
    }
}

impl SuggestionTable {
    pub fn new<K, V>(words: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            words: words
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(k, _): &(String, String)| !k.is_empty())
                .collect(),
            marker: DEFAULT_PLACEHOLDER_MARKER.to_string(),
        }
    }

    /// Load a table from a JSON object of `"source": "translation"` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suggestion table {}", path.display()))?;
        let words: IndexMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid suggestion table {}", path.display()))?;
        Ok(Self::new(words))
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Suggest a translation for `key`.
    pub fn suggest(&self, key: &str) -> Suggestion {
        if let Some(exact) = self.words.get(key) {
            return Suggestion::Exact(exact.clone());
        }

        let lowered = key.to_lowercase();
        for (word, translation) in &self.words {
            if !lowered.contains(&word.to_lowercase()) {
                continue;
            }
            let pattern = RegexBuilder::new(&regex::escape(word))
                .case_insensitive(true)
                .build();
            if let Ok(pattern) = pattern {
                let replaced = pattern.replace(key, NoExpand(translation.as_str()));
                return Suggestion::Compound(replaced.into_owned());
            }
        }

        Suggestion::Placeholder(format!("{} {}", self.marker, key))
    }
}
