//! Drives compilation of every configured catalog.
//!
//! For each language the external compiler is tried first; if it does not
//! produce the file, the source is parsed and written by the built-in
//! compiler and checked against the required keys. Catalogs are processed one
//! at a time and a failure in one never stops the others.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::catalog::{read_catalog, EntryOrder};
use crate::config::Config;
use crate::delegate::{
    ConfiguredCompiler, DelegateOutcome, ExternalCompiler, MsgfmtCompiler, NoExternalCompiler,
};
use crate::error::CompileError;
use crate::mo::{write_catalog, MO_EXTENSION, PO_EXTENSION};
use crate::suggest::SuggestionTable;
use crate::verify::{VerificationReport, VerificationReporter};

/// One source → output pair to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogJob {
    pub language: String,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl CatalogJob {
    /// `<root>/<lang>/LC_MESSAGES/<domain>.po` → same path with `.mo`.
    pub fn for_language(root: &Path, language: &str, domain: &str) -> Self {
        let source = root
            .join(language)
            .join("LC_MESSAGES")
            .join(format!("{domain}.{PO_EXTENSION}"));
        let output = source.with_extension(MO_EXTENSION);
        Self {
            language: language.to_string(),
            source,
            output,
        }
    }

    pub fn from_config(config: &Config) -> Vec<Self> {
        config
            .languages
            .iter()
            .map(|lang| Self::for_language(&config.translations_dir, lang, &config.domain))
            .collect()
    }
}

/// Which compiler produced a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMethod {
    External,
    Fallback,
}

/// Outcome of compiling one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CatalogStatus {
    Compiled {
        method: CompileMethod,
        /// Entry count and file size are only known for the built-in compiler.
        #[serde(skip_serializing_if = "Option::is_none")]
        entries: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bytes: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        verification: Option<VerificationReport>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

impl CatalogStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, CatalogStatus::Failed { .. })
    }
}

/// Per-catalog result returned by [`CompilerOrchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    #[serde(flatten)]
    pub job: CatalogJob,
    #[serde(flatten)]
    pub status: CatalogStatus,
}

/// Sequences delegate → parser → writer → reporter for each catalog.
#[derive(Debug, Clone)]
pub struct CompilerOrchestrator<D> {
    delegate: D,
    reporter: VerificationReporter,
    entry_order: EntryOrder,
}

impl CompilerOrchestrator<ConfiguredCompiler> {
    /// Build an orchestrator from configuration.
    ///
    /// Fails only if a configured suggestion table cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let delegate = match &config.msgfmt_program {
            Some(program) => ConfiguredCompiler::Msgfmt(
                MsgfmtCompiler::new(program).with_timeout(config.msgfmt_timeout),
            ),
            None => ConfiguredCompiler::Disabled(NoExternalCompiler),
        };

        let mut reporter = VerificationReporter::new(config.required_keys.iter().cloned());
        if let Some(path) = &config.suggestions_file {
            let table = SuggestionTable::from_json_file(path)?;
            info!("Loaded {} suggestions from {}", table.len(), path.display());
            reporter = reporter.with_suggestions(table);
        }

        Ok(Self::new(delegate, reporter).with_entry_order(config.entry_order))
    }
}

impl<D: ExternalCompiler> CompilerOrchestrator<D> {
    pub fn new(delegate: D, reporter: VerificationReporter) -> Self {
        Self {
            delegate,
            reporter,
            entry_order: EntryOrder::default(),
        }
    }

    pub fn with_entry_order(mut self, order: EntryOrder) -> Self {
        self.entry_order = order;
        self
    }

    /// Compile every job in order.
    pub async fn run(&self, jobs: &[CatalogJob]) -> Vec<CatalogReport> {
        let mut reports = Vec::with_capacity(jobs.len());
        for job in jobs {
            let status = self.compile_source(&job.source, &job.output).await;
            reports.push(CatalogReport {
                job: job.clone(),
                status,
            });
        }
        reports
    }

    /// Compile a single source file into `output`.
    pub async fn compile_source(&self, source: &Path, output: &Path) -> CatalogStatus {
        if !source.exists() {
            warn!("✗ {} not found, skipping", source.display());
            return CatalogStatus::Skipped {
                reason: format!("{} not found", source.display()),
            };
        }

        info!("Compiling {} to {}", source.display(), output.display());

        match self.delegate.compile(source, output).await {
            DelegateOutcome::Compiled => {
                info!("✓ Compiled using {}: {}", self.delegate.name(), output.display());
                return CatalogStatus::Compiled {
                    method: CompileMethod::External,
                    entries: None,
                    bytes: None,
                    verification: None,
                };
            }
            DelegateOutcome::Unavailable(reason) => {
                info!("{} unavailable ({}), using built-in compiler", self.delegate.name(), reason);
            }
            DelegateOutcome::Failed { status, .. } => {
                info!("{} failed ({}), using built-in compiler", self.delegate.name(), status);
            }
            DelegateOutcome::TimedOut(limit) => {
                info!("{} timed out after {:?}, using built-in compiler", self.delegate.name(), limit);
            }
        }

        match self.compile_locally(source, output) {
            Ok((entries, bytes, verification)) => {
                info!("✓ Compiled {} ({} translations)", output.display(), entries);
                CatalogStatus::Compiled {
                    method: CompileMethod::Fallback,
                    entries: Some(entries),
                    bytes: Some(bytes),
                    verification: Some(verification),
                }
            }
            Err(e) => {
                error!("✗ Failed to compile {}: {}", source.display(), e);
                CatalogStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn compile_locally(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<(usize, usize, VerificationReport), CompileError> {
        let catalog = read_catalog(source)?.ordered(self.entry_order);
        info!("Found {} translations", catalog.len());

        let bytes = write_catalog(&catalog, output)?;
        let verification = self.reporter.verify(&catalog);
        Ok((catalog.len(), bytes, verification))
    }
}
