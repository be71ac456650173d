//! Error types for atweave-transform
//!
//! The taxonomy separates three failure shapes:
//!
//! - mapping corruption (`Mapping`, fatal, aborts immediately)
//! - directives the table never matched (`Unresolved`, accumulated and
//!   reported together, never one at a time)
//! - resolved transforms the patcher could not locate (`IncompletePatch`,
//!   reported after the archive has already been partially mutated)

use thiserror::Error;

use crate::domain::UnresolvedReport;
use atweave_mappings::MappingError;

/// Main error type for transform resolution and application
#[derive(Debug, Error)]
pub enum TransformError {
    /// IO error while reading directive data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed directive text
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Mapping table inconsistency or bad namespace; never accumulated
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// One or more directives never matched by the mapping table.
    /// Carries every unresolved owner and member, not just the first.
    #[error("{0}")]
    Unresolved(UnresolvedReport),

    /// The binary patcher could not locate every requested class.
    /// The archive may already be partially mutated at this point.
    #[error("finished transforming {namespace} but missed {missed:?}")]
    IncompletePatch { namespace: String, missed: Vec<String> },

    /// Failure inside the binary patcher collaborator
    #[error("Patcher error: {0}")]
    Patcher(String),
}

impl TransformError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        TransformError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;
