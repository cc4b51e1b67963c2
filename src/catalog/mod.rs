//! In-memory translation catalog and its text-format parser.
//!
//! # Architecture
//!
//! - `parser`: turns `.po` source text into tagged per-record outcomes and
//!   folds them into a [`TranslationCatalog`]
//! - `unescape`: escape-sequence normalization applied to each logical string

mod parser;
mod unescape;

pub use parser::{parse_catalog, parse_records, read_catalog, RecordOutcome, SkipReason};
pub use unescape::unescape;

use indexmap::IndexMap;
use serde::Serialize;

/// A single key → localized value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub key: String,
    pub value: String,
}

impl CatalogEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Order in which entries are laid out in a binary catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Order of first occurrence in the source text.
    #[default]
    Source,
    /// Ascending by key bytes, for readers that binary-search the origin table.
    Sorted,
}

impl std::str::FromStr for EntryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "sorted" => Ok(Self::Sorted),
            other => Err(format!("Unknown entry order: {other} (expected 'source' or 'sorted')")),
        }
    }
}

/// Ordered set of translations for one language.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// its original position, and entries with an empty key or value are never
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationCatalog {
    entries: IndexMap<String, String>,
}

impl TranslationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a translation, returning `false` if it was dropped as empty.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return a copy of this catalog arranged in the given order.
    pub fn ordered(&self, order: EntryOrder) -> Self {
        match order {
            EntryOrder::Source => self.clone(),
            EntryOrder::Sorted => {
                let mut entries = self.entries.clone();
                entries.sort_by(|a, _, b, _| a.as_bytes().cmp(b.as_bytes()));
                Self { entries }
            }
        }
    }
}

impl FromIterator<CatalogEntry> for TranslationCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry.key, entry.value);
        }
        catalog
    }
}
