//! Room manager: creates, tracks, and destroys room actors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use intrigue_protocol::RoomId;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Tracks every live room.
///
/// The manager only maps ids to handles. All per-room work happens in
/// the room actors, so callers should clone a handle with
/// [`RoomManager::handle`] and release any lock around the manager
/// before awaiting on it.
pub struct RoomManager {
    config: RoomConfig,
    rooms: HashMap<RoomId, RoomHandle>,
}

impl RoomManager {
    /// Creates an empty manager using the default room configuration.
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    /// Creates an empty manager whose rooms use `config`.
    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
        }
    }

    /// Spawns a new room actor and returns its ID.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn create_room(&mut self) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(room_id, &self.config);
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, rooms = self.rooms.len(), "room created");
        room_id
    }

    /// Returns a handle to a live room.
    pub fn handle(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Forgets a room and returns its handle so the caller can shut it
    /// down without holding on to the manager.
    ///
    /// Handles cloned earlier keep their last snapshot, and once the room
    /// is shut down every later `mutate` on them fails with
    /// [`RoomError::Unavailable`].
    pub fn remove_room(&mut self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        tracing::info!(%room_id, rooms = self.rooms.len(), "room removed");
        Ok(handle)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all live room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
