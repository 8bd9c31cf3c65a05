//! Domain factories for creating domain entities and value objects.

use super::value_object::ConnectionId;

/// Factory for generating ConnectionId instances.
///
/// Encapsulates id generation, separating the generation concern from the
/// validation logic in ConnectionId.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}
