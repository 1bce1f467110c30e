//! Error types for argument transformation.

use std::error::Error as StdError;

use thiserror::Error;

use crate::pattern::PatternError;

/// The error type a bound transformation callable may return.
pub type CalleeError = Box<dyn StdError + Send + Sync>;

/// A bound transformation callable failed while being invoked.
#[derive(Debug, Error)]
pub enum CallError {
    /// The callable returned an error.
    #[error("transformation '{transformation}' failed: {source}")]
    Failed {
        transformation: String,
        #[source]
        source: CalleeError,
    },

    /// The callable panicked.
    #[error("transformation '{transformation}' panicked: {message}")]
    Panicked {
        transformation: String,
        message: String,
    },
}

impl CallError {
    /// Pattern of the transformation whose callable failed.
    pub fn transformation(&self) -> &str {
        match self {
            CallError::Failed { transformation, .. } | CallError::Panicked { transformation, .. } => {
                transformation
            }
        }
    }
}

/// An error that aborted a `transform` call.
///
/// "No rule matched" is never an error; only a failing callable or a
/// pattern that cannot be compiled stops the pipeline.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Call(#[from] CallError),
}

/// Errors raised by the built-in conversions.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unknown conversion '{name}'{}", did_you_mean(.suggestions))]
    Unknown {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("conversion '{conversion}' cannot convert {kind} '{value}'")]
    Unconvertible {
        conversion: &'static str,
        kind: &'static str,
        value: String,
    },

    #[error("conversion '{conversion}' expects an argument")]
    MissingArgument { conversion: &'static str },
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}
