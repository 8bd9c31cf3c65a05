//! Server state, live room wiring, and the room registry.

use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, mpsc};

use crate::domain::{CodeBlockId, CodeBlockRepository, ConnectionId, Room};

/// Capacity of each connection's outbound send queue. A connection that
/// cannot drain its queue is treated as dead and evicted.
pub const SEND_QUEUE_CAPACITY: usize = 64;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub code_block_id: String,
}

/// Client connection information
pub struct ClientInfo {
    /// Outbound message queue (bounded)
    pub sender: mpsc::Sender<String>,
    /// Unix timestamp when connected (milliseconds)
    pub connected_at: i64,
}

/// Live state of one collaboration room: the domain model plus the outbound
/// queues of every connection currently in it.
pub struct RoomState {
    /// Room domain model (code text, participants, roles)
    pub room: Room,
    /// Outbound queues keyed by connection id
    pub clients: HashMap<ConnectionId, ClientInfo>,
    /// Set once the room has been dissolved. A dissolved room rejects edits;
    /// a join that lands on one retries against a fresh registry entry.
    pub dissolved: bool,
}

impl RoomState {
    /// Wrap a fresh domain room with empty wiring
    pub fn new(room: Room) -> Self {
        Self {
            room,
            clients: HashMap::new(),
            dissolved: false,
        }
    }

    /// Queue a payload to a single connection.
    pub fn send_to(&mut self, target: &ConnectionId, payload: &str) {
        let failed = match self.clients.get(target) {
            Some(info) => info.sender.try_send(payload.to_string()).is_err(),
            None => false,
        };
        if failed {
            tracing::warn!("Send queue full or closed for connection '{}', evicting", target);
            self.clients.remove(target);
        }
    }

    /// Queue a payload to every connection in the room. Returns the number of
    /// connections the payload was queued to.
    pub fn broadcast(&mut self, payload: &str) -> usize {
        self.broadcast_inner(None, payload)
    }

    /// Queue a payload to every connection except `exclude`.
    pub fn broadcast_except(&mut self, exclude: &ConnectionId, payload: &str) -> usize {
        self.broadcast_inner(Some(exclude), payload)
    }

    fn broadcast_inner(&mut self, exclude: Option<&ConnectionId>, payload: &str) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();
        for (id, info) in self.clients.iter() {
            if Some(id) == exclude {
                continue;
            }
            match info.sender.try_send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(_) => stale.push(id.clone()),
            }
        }
        for id in &stale {
            tracing::warn!("Send queue full or closed for connection '{}', evicting", id);
            self.clients.remove(id);
        }
        delivered
    }
}

/// Registry of active collaboration rooms, keyed by code block id.
///
/// Room creation is serialized by the registry lock: two racing first joins
/// resolve to a single room instance. The registry lock covers only map
/// operations and is never held together with a room lock.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<CodeBlockId, Arc<Mutex<RoomState>>>>,
}

impl RoomRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Get the active room for a code block, if any.
    pub async fn get(&self, id: &CodeBlockId) -> Option<Arc<Mutex<RoomState>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(id).cloned()
    }

    /// Get the active room for a code block, creating it from `make` when
    /// absent.
    pub async fn get_or_create(
        &self,
        id: &CodeBlockId,
        make: impl FnOnce() -> Room,
    ) -> Arc<Mutex<RoomState>> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(RoomState::new(make()))))
            .clone()
    }

    /// Remove the registry entry for `id` only while it still is `expected`.
    ///
    /// Guards against removing a fresh room that replaced a dissolved one
    /// between the caller's room-lock release and this call.
    pub async fn remove_if_same(&self, id: &CodeBlockId, expected: &Arc<Mutex<RoomState>>) {
        let mut rooms = self.rooms.lock().await;
        if let Some(current) = rooms.get(id)
            && Arc::ptr_eq(current, expected)
        {
            rooms.remove(id);
        }
    }

    /// Number of active rooms.
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn CodeBlockRepository>,
    /// Active collaboration rooms
    pub registry: Arc<RoomRegistry>,
}
