//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// CodeBlockId validation error
    #[error("CodeBlockId cannot be empty")]
    CodeBlockIdEmpty,

    /// CodeBlockId too long error
    #[error("CodeBlockId cannot exceed {max} characters (got {actual})")]
    CodeBlockIdTooLong { max: usize, actual: usize },

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// CodeContent too long error
    #[error("CodeContent cannot exceed {max} characters (got {actual})")]
    CodeContentTooLong { max: usize, actual: usize },

    /// Rating value outside the accepted domain
    #[error("rating must be between {min} and {max} (got {actual})")]
    RatingOutOfRange { min: i64, max: i64, actual: i64 },
}
