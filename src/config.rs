use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::EntryOrder;

/// Keys every catalog is expected to translate (the admin login page).
pub const DEFAULT_REQUIRED_KEYS: &[&str] =
    &["Admin Login", "Email Address", "Password", "Remember me", "Sign In"];

#[derive(Debug, Clone)]
pub struct Config {
    // Catalog locations
    pub translations_dir: PathBuf,
    pub languages: Vec<String>,
    pub domain: String,

    // External compiler (None disables it)
    pub msgfmt_program: Option<PathBuf>,
    pub msgfmt_timeout: Option<Duration>,

    // Output
    pub entry_order: EntryOrder,

    // Verification
    pub required_keys: Vec<String>,
    pub suggestions_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translations_dir: PathBuf::from("translations"),
            languages: vec!["ar".to_string(), "en".to_string()],
            domain: "messages".to_string(),
            msgfmt_program: Some(PathBuf::from("msgfmt")),
            msgfmt_timeout: None,
            entry_order: EntryOrder::Source,
            required_keys: DEFAULT_REQUIRED_KEYS.iter().map(|k| k.to_string()).collect(),
            suggestions_file: None,
        }
    }
}

/// Split a comma-separated list, dropping blank items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let languages = match std::env::var("CATALOG_LANGUAGES") {
            Ok(value) => split_list(&value),
            Err(_) => defaults.languages,
        };
        if languages.is_empty() {
            bail!("CATALOG_LANGUAGES must name at least one language");
        }

        let msgfmt_program = match std::env::var("MSGFMT_BIN") {
            Ok(value) if value.trim().is_empty() || value.trim().eq_ignore_ascii_case("none") => {
                None
            }
            Ok(value) => Some(PathBuf::from(value.trim())),
            Err(_) => defaults.msgfmt_program,
        };

        let msgfmt_timeout = match std::env::var("MSGFMT_TIMEOUT_SECS") {
            Ok(value) => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("MSGFMT_TIMEOUT_SECS is not a number: {value}"))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let entry_order = match std::env::var("CATALOG_ENTRY_ORDER") {
            Ok(value) => value.parse().map_err(anyhow::Error::msg)?,
            Err(_) => defaults.entry_order,
        };

        Ok(Self {
            // Catalog locations
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.translations_dir),
            languages,
            domain: std::env::var("CATALOG_DOMAIN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.domain),

            // External compiler
            msgfmt_program,
            msgfmt_timeout,

            // Output
            entry_order,

            // Verification
            required_keys: std::env::var("REQUIRED_KEYS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.required_keys),
            suggestions_file: std::env::var("SUGGESTIONS_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "TRANSLATIONS_DIR",
        "CATALOG_LANGUAGES",
        "CATALOG_DOMAIN",
        "MSGFMT_BIN",
        "MSGFMT_TIMEOUT_SECS",
        "CATALOG_ENTRY_ORDER",
        "REQUIRED_KEYS",
        "SUGGESTIONS_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.translations_dir, PathBuf::from("translations"));
        assert_eq!(config.languages, vec!["ar", "en"]);
        assert_eq!(config.domain, "messages");
        assert_eq!(config.msgfmt_program, Some(PathBuf::from("msgfmt")));
        assert_eq!(config.msgfmt_timeout, None);
        assert_eq!(config.entry_order, EntryOrder::Source);
        assert_eq!(config.required_keys.len(), 5);
        assert!(config.suggestions_file.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("TRANSLATIONS_DIR", "/srv/app/translations");
        std::env::set_var("CATALOG_LANGUAGES", "fr, de ,");
        std::env::set_var("MSGFMT_TIMEOUT_SECS", "30");
        std::env::set_var("CATALOG_ENTRY_ORDER", "sorted");
        std::env::set_var("REQUIRED_KEYS", "Save,Cancel");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.translations_dir, PathBuf::from("/srv/app/translations"));
        assert_eq!(config.languages, vec!["fr", "de"]);
        assert_eq!(config.msgfmt_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.entry_order, EntryOrder::Sorted);
        assert_eq!(config.required_keys, vec!["Save", "Cancel"]);
    }

    #[test]
    #[serial]
    fn test_from_env_msgfmt_disabled() {
        clear_env();
        std::env::set_var("MSGFMT_BIN", "none");
        let config = Config::from_env().unwrap();
        clear_env();
        assert!(config.msgfmt_program.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_zero_timeout_means_none() {
        clear_env();
        std::env::set_var("MSGFMT_TIMEOUT_SECS", "0");
        let config = Config::from_env().unwrap();
        clear_env();
        assert!(config.msgfmt_timeout.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        std::env::set_var("MSGFMT_TIMEOUT_SECS", "soon");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("CATALOG_ENTRY_ORDER", "random");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("CATALOG_LANGUAGES", " , ");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
