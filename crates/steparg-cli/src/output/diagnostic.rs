//! Miette diagnostic wrapper for translation file parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;
use thiserror::Error;

/// A miette-compatible diagnostic for translation file syntax errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(
    code(steparg::translations),
    help("entries look like \"source pattern\" = \"translated pattern\";")
)]
pub struct TranslationDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,
}

impl TranslationDiagnostic {
    /// Create a diagnostic from a parse location within `content`.
    pub fn new(path: &Path, content: &str, line: usize, column: usize, message: &str) -> Self {
        // Sum of (line_length + 1) for lines before the error line, plus column.
        let offset = content
            .lines()
            .take(line.saturating_sub(1))
            .map(|l| l.len() + 1)
            .sum::<usize>()
            + column.saturating_sub(1);

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = offset.min(content.len());

        TranslationDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message: message.to_string(),
        }
    }
}
