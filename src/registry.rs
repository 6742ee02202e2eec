//! Room registry
//!
//! Maps room codes to rooms and owns the membership lifecycle:
//! creation with collision-retried codes, idempotent ensure for
//! externally distributed codes, capacity-checked join, and leave with
//! empty-room garbage collection. The registry lives inside the server
//! actor; confinement to that single task is what makes membership
//! mutations atomic with respect to each other.

use std::collections::HashMap;

use tracing::debug;

use crate::error::AppError;
use crate::room::Room;
use crate::types::{ClientId, RoomCode};

/// Registry of all active rooms
///
/// The sole owner of the code → members mapping. Holds the room
/// capacity so the join check has a single source of truth.
#[derive(Debug)]
pub struct RoomRegistry {
    /// All active rooms: RoomCode -> Room
    rooms: HashMap<RoomCode, Room>,
    /// Maximum members per room
    capacity: usize,
}

impl RoomRegistry {
    /// Create an empty registry with the given room capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            capacity,
        }
    }

    /// Create a new room under a freshly generated unique code
    ///
    /// Collisions with existing codes are retried transparently; with a
    /// 36^6 code space they are rare but expected over time.
    pub fn create_room(&mut self) -> RoomCode {
        let code = loop {
            let code = RoomCode::generate();
            if !self.rooms.contains_key(&code) {
                break code;
            }
        };
        self.rooms.insert(code.clone(), Room::new(code.clone()));
        debug!("Room {} created", code);
        code
    }

    /// Idempotently create an entry for `code` if absent
    ///
    /// Lets clients join codes distributed out-of-band without a
    /// creation step.
    pub fn ensure_room(&mut self, code: &RoomCode) {
        self.rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code.clone()));
    }

    /// Add a connection to a room, returning the new member count
    ///
    /// Fails with `RoomFull` when the room is at capacity, without
    /// touching membership. Creates the room entry if absent.
    pub fn join(&mut self, code: &RoomCode, client_id: ClientId) -> Result<usize, AppError> {
        let room = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code.clone()));
        if room.len() >= self.capacity {
            // Don't let a failed join leave an empty room behind
            let was_empty = room.is_empty();
            if was_empty {
                self.rooms.remove(code);
            }
            return Err(AppError::RoomFull);
        }
        room.insert(client_id);
        Ok(room.len())
    }

    /// Remove a connection from a room, returning the remaining count
    ///
    /// No-op-safe if the room or the member is already gone. Deletes
    /// the room when its last member leaves.
    pub fn leave(&mut self, code: &RoomCode, client_id: ClientId) -> usize {
        let Some(room) = self.rooms.get_mut(code) else {
            return 0;
        };
        room.remove(client_id);
        let remaining = room.len();
        if remaining == 0 {
            if let Some(room) = self.rooms.remove(code) {
                debug!("Room {} deleted after {:?}", code, room.created_at.elapsed());
            }
        }
        remaining
    }

    /// Current member count of a room, 0 if it does not exist
    pub fn member_count(&self, code: &RoomCode) -> usize {
        self.rooms.get(code).map_or(0, |room| room.len())
    }

    /// Snapshot of a room's members, for fan-out
    pub fn members(&self, code: &RoomCode) -> Vec<ClientId> {
        self.rooms
            .get(code)
            .map(|room| room.members().collect())
            .unwrap_or_default()
    }

    /// Check whether a join would still fit
    pub fn has_capacity(&self, code: &RoomCode) -> bool {
        self.member_count(code) < self.capacity
    }

    /// Check whether a room exists
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Number of active rooms
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
