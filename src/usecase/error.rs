//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// Errors returned when joining a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// Unknown code block id
    #[error("code block not found: {0}")]
    CodeBlockNotFound(String),
}

/// Errors returned when applying a code edit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// No active room for the code block (never created, or dissolved)
    #[error("no active room for code block: {0}")]
    RoomNotActive(String),

    /// The connection is not a participant of the room
    #[error("connection '{0}' is not a participant of the room")]
    NotAParticipant(String),
}

/// Errors returned when submitting a rating
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// Unknown code block id
    #[error("code block not found: {0}")]
    CodeBlockNotFound(String),

    /// Rating value outside the accepted domain
    #[error(transparent)]
    InvalidRating(ValueObjectError),
}
