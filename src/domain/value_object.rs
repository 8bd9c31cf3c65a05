//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Code block identifier value object.
///
/// Identifies one exercise in the catalog; also the key under which an
/// active collaboration room is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeBlockId(String);

impl CodeBlockId {
    /// Create a new CodeBlockId.
    ///
    /// # Arguments
    ///
    /// * `id` - The code block identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the CodeBlockId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::CodeBlockIdEmpty);
        }
        let len = id.len();
        if len > 100 {
            return Err(ValueObjectError::CodeBlockIdTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for CodeBlockId {
    type Error = ValueObjectError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl fmt::Display for CodeBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection identifier value object.
///
/// Identifies one live participant connection. Generated server-side, never
/// supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    ///
    /// # Arguments
    ///
    /// * `id` - The connection identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Create a ConnectionId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared code text value object.
///
/// The empty string is valid: an editor may clear the whole buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContent(String);

impl CodeContent {
    /// Create a new CodeContent.
    ///
    /// # Arguments
    ///
    /// * `content` - The code text
    ///
    /// # Returns
    ///
    /// A Result containing the CodeContent or an error if validation fails
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let len = content.len();
        if len > 100_000 {
            return Err(ValueObjectError::CodeContentTooLong {
                max: 100_000,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for CodeContent {
    type Error = ValueObjectError;

    fn try_from(content: String) -> Result<Self, Self::Error> {
        Self::new(content)
    }
}

/// Rating score value object.
///
/// An integer rating in the inclusive domain 1..=5. Out-of-range values are
/// rejected at construction, before any aggregate is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScore(u8);

impl RatingScore {
    /// Minimum accepted rating
    pub const MIN: i64 = 1;
    /// Maximum accepted rating
    pub const MAX: i64 = 5;

    /// Create a new RatingScore.
    ///
    /// # Arguments
    ///
    /// * `value` - The submitted rating
    ///
    /// # Returns
    ///
    /// A Result containing the RatingScore or an error if the value is
    /// outside 1..=5
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueObjectError::RatingOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value as u8))
    }

    /// Get the inner value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    ///
    /// # Returns
    ///
    /// A Timestamp instance
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
