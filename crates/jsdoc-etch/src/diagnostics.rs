//! Error types
//!
//! Contract violations are reported through [`EtchError`]. Parse and emit
//! failures of a single translation are folded by `translate` into a
//! [`crate::TranslateError`] that keeps the text state at the point of
//! failure.

use thiserror::Error;

/// Result type for jsdoc-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for jsdoc-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// The source text could not be parsed
    #[error("TypeScript parse error: {0}")]
    Parse(String),

    /// The documented source text could not be parsed again
    #[error("Parse error after documenting: {0}")]
    Reparse(String),

    /// Type erasure failed
    #[error("Emit error: {0}")]
    Emit(String),

    /// A required argument was not supplied
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
}

impl EtchError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        EtchError::Parse(message.into())
    }

    /// Create an emit error
    pub fn emit(message: impl Into<String>) -> Self {
        EtchError::Emit(message.into())
    }

    /// Turn a parse error of the first pass into one of the second pass
    pub fn into_reparse(self) -> Self {
        match self {
            EtchError::Parse(message) => EtchError::Reparse(message),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EtchError::MissingArgument("tag names");
        assert_eq!(err.to_string(), "Missing required argument: tag names");

        let err = EtchError::parse("Expected ';'");
        assert_eq!(err.to_string(), "TypeScript parse error: Expected ';'");
    }

    #[test]
    fn test_into_reparse() {
        let err = EtchError::parse("oops").into_reparse();
        assert!(matches!(err, EtchError::Reparse(ref m) if m == "oops"));

        let err = EtchError::emit("bad").into_reparse();
        assert!(matches!(err, EtchError::Emit(_)));
    }
}
