//! Error types for atweave-mappings

use thiserror::Error;

/// Main error type for mapping table operations
#[derive(Debug, Error)]
pub enum MappingError {
    /// IO error while reading mapping data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed mapping data
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Namespace not part of the loaded mapping set
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    /// An entry exists in one namespace but has no counterpart in another.
    /// This indicates corrupted mapping data, not a bad query.
    #[error("Missing {namespace} counterpart for {symbol}")]
    MissingCounterpart { namespace: String, symbol: String },

    /// Malformed type descriptor
    #[error("Invalid descriptor: {0}")]
    Descriptor(String),
}

impl MappingError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        MappingError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;
