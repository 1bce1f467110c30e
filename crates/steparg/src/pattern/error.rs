//! Pattern compilation errors.

use thiserror::Error;

/// An error raised while compiling a step or transformation pattern.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// The pattern (or what it expanded to) is not a valid regular expression.
    #[error("invalid regex in pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern is malformed before it ever reaches the regex engine.
    #[error("syntax error in pattern '{pattern}' at {position}: {message}")]
    Syntax {
        pattern: String,
        position: usize,
        message: String,
    },
}

impl PatternError {
    /// The pattern text that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::Regex { pattern, .. } | PatternError::Syntax { pattern, .. } => pattern,
        }
    }
}
