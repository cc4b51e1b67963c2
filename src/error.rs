use std::path::PathBuf;
use thiserror::Error;

/// Failures reading a catalog source.
///
/// These abort compilation of one catalog only; the orchestrator reports them
/// and moves on to the next language.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog {path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Failures building, writing or reading a binary catalog.
#[derive(Error, Debug)]
pub enum MoError {
    /// A string or offset does not fit the 32-bit fields of the format.
    #[error("{what} of {len} bytes exceeds the 32-bit limit of the binary catalog format")]
    SizeOverflow { what: &'static str, len: usize },

    #[error("Failed to write binary catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a binary catalog: bad magic number {0:#010x}")]
    BadMagic(u32),

    #[error("Binary catalog truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Descriptor {index} points outside the file ({offset}+{len} > {size})")]
    OutOfBounds {
        index: usize,
        offset: u32,
        len: u32,
        size: usize,
    },

    #[error("String {index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },
}

/// Any failure that stops one catalog from being compiled.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Mo(#[from] MoError),
}
