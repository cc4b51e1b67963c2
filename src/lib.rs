//! Compiler for gettext-style translation catalogs.
//!
//! Turns `<lang>/LC_MESSAGES/messages.po` sources into the binary `.mo`
//! format, preferring an external `msgfmt` when one is installed and falling
//! back to the built-in parser and writer otherwise.

pub mod catalog;
pub mod config;
pub mod delegate;
pub mod error;
pub mod mo;
pub mod orchestrator;
pub mod suggest;
pub mod verify;

pub use catalog::{CatalogEntry, EntryOrder, TranslationCatalog};
pub use error::{CatalogError, CompileError, MoError};
pub use orchestrator::{CatalogReport, CatalogStatus, CompileMethod, CompilerOrchestrator};
