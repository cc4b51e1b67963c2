//! Post-compile sanity check for a fixed list of must-have keys.
//!
//! The check is informational: a missing key is logged and reported, but the
//! binary catalog is written regardless.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::TranslationCatalog;
use crate::suggest::{Suggestion, SuggestionTable};

/// A required key that the catalog does not translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKey {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

/// Presence of each required key in a compiled catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Required keys found, with their translation
    pub present: Vec<(String, String)>,

    /// Required keys not found
    pub missing: Vec<MissingKey>,
}

impl VerificationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every required key was found
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_keys(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(|m| m.key.as_str())
    }
}

/// Checks catalogs against a caller-supplied list of required keys.
#[derive(Debug, Clone, Default)]
pub struct VerificationReporter {
    required: Vec<String>,
    suggestions: Option<SuggestionTable>,
}

impl VerificationReporter {
    pub fn new<S: Into<String>>(required: impl IntoIterator<Item = S>) -> Self {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            suggestions: None,
        }
    }

    /// Attach a table used to propose translations for missing keys.
    pub fn with_suggestions(mut self, table: SuggestionTable) -> Self {
        self.suggestions = Some(table);
        self
    }

    /// Report which required keys `catalog` contains.
    pub fn verify(&self, catalog: &TranslationCatalog) -> VerificationReport {
        let mut report = VerificationReport::new();

        for key in &self.required {
            match catalog.get(key) {
                Some(value) => {
                    info!("  ✓ {} → {}", key, value);
                    report.present.push((key.clone(), value.to_string()));
                }
                None => {
                    let suggestion = self.suggestions.as_ref().map(|table| table.suggest(key));
                    match &suggestion {
                        Some(s) => warn!("  ✗ Missing: {} (suggested: {})", key, s.text()),
                        None => warn!("  ✗ Missing: {}", key),
                    }
                    report.missing.push(MissingKey {
                        key: key.clone(),
                        suggestion,
                    });
                }
            }
        }

        report
    }
}
