//! Error types for translation loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A syntax error in a translation file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Errors that occur while loading translations into a catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a translation file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse error with file location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Attempted to reload translations that were loaded from a string.
    #[error("cannot reload '{domain}/{locale}': was loaded from string, not file")]
    NoPathForReload { domain: String, locale: String },
}
