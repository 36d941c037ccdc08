//! Error types for the Oracle grammar.

use thiserror::Error;

/// The main error type for grammar and execution operations.
#[derive(Debug, Error)]
pub enum OciError {
    /// The requested feature has no Oracle equivalent.
    #[error("{feature} is not supported by the Oracle grammar")]
    Unsupported { feature: &'static str },

    /// Row-value comparison with column and value lists of different length.
    #[error("Row value arity mismatch: {columns} column(s) compared against {values} value(s)")]
    ArityMismatch { columns: usize, values: usize },

    /// Insert without any column and without a generated key to fall back on.
    #[error("Cannot compile an insert into '{0}' without columns")]
    EmptyInsert(String),

    /// The query or blueprint shape is invalid for the requested statement.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown column type declaration.
    #[error("Unknown column type: '{0}'")]
    InvalidType(String),

    /// Execution error reported by the executor.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OciError {
    /// Create an unsupported-feature error.
    pub fn unsupported(feature: &'static str) -> Self {
        Self::Unsupported { feature }
    }

    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for grammar operations.
pub type OciResult<T> = Result<T, OciError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OciError::unsupported("lock in share mode");
        assert_eq!(
            err.to_string(),
            "lock in share mode is not supported by the Oracle grammar"
        );

        let err = OciError::ArityMismatch { columns: 2, values: 3 };
        assert_eq!(
            err.to_string(),
            "Row value arity mismatch: 2 column(s) compared against 3 value(s)"
        );
    }
}
