//! Room model
//!
//! A room is a named node of the map graph with a role and an ordered list
//! of neighbors. `RoomRecord` is the same room keyed by names instead of
//! ids, which is the shape the room files store.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::MAX_CONNECTIONS;

/// Role of a room in the traversal.
///
/// The strum serializations are the tokens written after `ROOM TYPE:` and
/// are used for both encoding and decoding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum RoomRole {
    #[strum(serialize = "START_ROOM")]
    Start,
    #[default]
    #[strum(serialize = "MID_ROOM")]
    Mid,
    #[strum(serialize = "END_ROOM")]
    End,
}

/// A room in a generated or loaded map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of this room in its map
    pub id: usize,
    pub name: String,
    pub role: RoomRole,
    /// Neighbor ids in the order the connections were made
    pub neighbors: Vec<usize>,
}

impl Room {
    pub fn new(id: usize, name: impl Into<String>, role: RoomRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            neighbors: Vec::with_capacity(MAX_CONNECTIONS),
        }
    }

    /// Number of connections
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether another connection may be added
    pub fn has_capacity(&self) -> bool {
        self.degree() < MAX_CONNECTIONS
    }

    pub fn is_connected_to(&self, id: usize) -> bool {
        self.neighbors.contains(&id)
    }

    /// Record one side of a connection. The caller adds the other side.
    pub(crate) fn add_neighbor(&mut self, id: usize) {
        assert!(self.has_capacity(), "room {} is already full", self.name);
        debug_assert!(id != self.id && !self.is_connected_to(id));
        self.neighbors.push(id);
    }
}

/// A room as stored on disk: neighbors are referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub name: String,
    pub role: RoomRole,
    /// Neighbor names, order preserved
    pub connections: Vec<String>,
}

impl RoomRecord {
    pub fn new(name: impl Into<String>, role: RoomRole, connections: Vec<String>) -> Self {
        Self {
            name: name.into(),
            role,
            connections,
        }
    }
}
