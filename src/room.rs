//! Room struct definition
//!
//! A room is an unordered set of member connections identified by a
//! shared code. Capacity enforcement lives in the registry; the room
//! itself only tracks membership.

use std::collections::HashSet;
use std::time::Instant;

use crate::types::{ClientId, RoomCode};

/// A chat room
///
/// Holds the current member set. A room in the registry always has at
/// least one member; the registry deletes it the moment it empties.
#[derive(Debug)]
pub struct Room {
    /// Room code for identification
    pub code: RoomCode,
    /// Current members
    members: HashSet<ClientId>,
    /// Room creation time
    pub created_at: Instant,
}

impl Room {
    /// Create a new empty room with the given code
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            members: HashSet::new(),
            created_at: Instant::now(),
        }
    }

    /// Add a member; returns false if they were already present
    pub fn insert(&mut self, client_id: ClientId) -> bool {
        self.members.insert(client_id)
    }

    /// Remove a member; returns false if they were not present
    pub fn remove(&mut self, client_id: ClientId) -> bool {
        self.members.remove(&client_id)
    }

    /// Check if a client is a member of this room
    pub fn contains(&self, client_id: ClientId) -> bool {
        self.members.contains(&client_id)
    }

    /// Current member count
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the room has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the current members
    pub fn members(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_starts_empty() {
        let room = Room::new(RoomCode::generate());
        assert!(room.is_empty());
        assert_eq!(room.len(), 0);
    }

    #[test]
    fn test_room_membership() {
        let mut room = Room::new(RoomCode::generate());
        let a = ClientId::new();
        let b = ClientId::new();

        assert!(room.insert(a));
        assert!(room.insert(b));
        assert_eq!(room.len(), 2);
        assert!(room.contains(a));
        assert!(room.contains(b));

        // Inserting twice is a no-op
        assert!(!room.insert(a));
        assert_eq!(room.len(), 2);
    }

    #[test]
    fn test_room_remove() {
        let mut room = Room::new(RoomCode::generate());
        let a = ClientId::new();
        let stranger = ClientId::new();
        room.insert(a);

        // Removing a non-member is safe
        assert!(!room.remove(stranger));
        assert_eq!(room.len(), 1);

        assert!(room.remove(a));
        assert!(room.is_empty());
    }

    #[test]
    fn test_room_members_snapshot() {
        let mut room = Room::new(RoomCode::generate());
        let a = ClientId::new();
        let b = ClientId::new();
        room.insert(a);
        room.insert(b);

        let members: Vec<ClientId> = room.members().collect();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&a));
        assert!(members.contains(&b));
    }
}
