//! Fixed-size room map
//!
//! A `Map` always holds exactly `PLAY_ROOMS` rooms. Every constructor runs
//! `validate`, so a `Map` value satisfies the graph invariants:
//! unique names, symmetric connections, no self-loops or repeated
//! connections, bounded degrees, one start room and one end room.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::room::{Room, RoomRecord, RoomRole};
use crate::{MAX_CONNECTIONS, MIN_CONNECTIONS, PLAY_ROOMS};

/// Structural problems found while building or checking a map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("expected {expected} rooms, found {found}")]
    WrongRoomCount { expected: usize, found: usize },

    #[error("room at index {index} has id {id}")]
    IdMismatch { index: usize, id: usize },

    #[error("duplicate room name {0}")]
    DuplicateName(String),

    #[error("room {room} connects to unknown room {neighbor}")]
    UnknownNeighbor { room: String, neighbor: String },

    #[error("room {0} connects to itself")]
    SelfLoop(String),

    #[error("room {room} lists {neighbor} more than once")]
    DuplicateConnection { room: String, neighbor: String },

    #[error("room {room} lists {neighbor}, but {neighbor} does not list {room}")]
    Asymmetric { room: String, neighbor: String },

    #[error("room {room} has {degree} connections, at most {max} allowed", max = MAX_CONNECTIONS)]
    TooManyConnections { room: String, degree: usize },

    #[error(
        "only {found} rooms have between {min} and {max} connections, need {needed}",
        min = MIN_CONNECTIONS,
        max = MAX_CONNECTIONS
    )]
    TooFewConnected { found: usize, needed: usize },

    #[error("expected exactly one {role} room, found {found}")]
    RoleCount { role: RoomRole, found: usize },

    #[error("{role} index {index} points at a different room")]
    MisplacedRole { role: RoomRole, index: usize },
}

/// The room graph plus cached start and end indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    rooms: [Room; PLAY_ROOMS],
    start_index: usize,
    end_index: usize,
}

impl Map {
    /// Build a map from fully wired rooms. Room ids must match their index.
    pub fn new(rooms: [Room; PLAY_ROOMS]) -> Result<Self, MapError> {
        let start_index = find_role(&rooms, RoomRole::Start)?;
        let end_index = find_role(&rooms, RoomRole::End)?;
        let map = Self {
            rooms,
            start_index,
            end_index,
        };
        map.validate()?;
        Ok(map)
    }

    /// Assemble a map from name-keyed records, resolving neighbor names to
    /// ids. Room ids follow the order of `records`.
    pub fn from_records(records: Vec<RoomRecord>) -> Result<Self, MapError> {
        if records.len() != PLAY_ROOMS {
            return Err(MapError::WrongRoomCount {
                expected: PLAY_ROOMS,
                found: records.len(),
            });
        }

        let mut ids = HashMap::with_capacity(PLAY_ROOMS);
        for (id, record) in records.iter().enumerate() {
            if ids.insert(record.name.clone(), id).is_some() {
                return Err(MapError::DuplicateName(record.name.clone()));
            }
        }

        let mut rooms = Vec::with_capacity(PLAY_ROOMS);
        for (id, record) in records.into_iter().enumerate() {
            let mut room = Room::new(id, record.name, record.role);
            for neighbor in record.connections {
                match ids.get(&neighbor) {
                    Some(&neighbor_id) => room.neighbors.push(neighbor_id),
                    None => {
                        return Err(MapError::UnknownNeighbor {
                            room: room.name,
                            neighbor,
                        });
                    }
                }
            }
            rooms.push(room);
        }

        let rooms: [Room; PLAY_ROOMS] =
            rooms
                .try_into()
                .map_err(|rooms: Vec<Room>| MapError::WrongRoomCount {
                    expected: PLAY_ROOMS,
                    found: rooms.len(),
                })?;
        Self::new(rooms)
    }

    /// Name-keyed form of every room, in id order
    pub fn to_records(&self) -> Vec<RoomRecord> {
        self.rooms
            .iter()
            .map(|room| {
                RoomRecord::new(
                    room.name.clone(),
                    room.role,
                    self.neighbor_names(room.id).map(str::to_string).collect(),
                )
            })
            .collect()
    }

    /// Check every structural invariant of the graph
    pub fn validate(&self) -> Result<(), MapError> {
        let mut names = HashSet::with_capacity(PLAY_ROOMS);
        for (index, room) in self.rooms.iter().enumerate() {
            if room.id != index {
                return Err(MapError::IdMismatch { index, id: room.id });
            }
            if !names.insert(room.name.as_str()) {
                return Err(MapError::DuplicateName(room.name.clone()));
            }
        }

        for room in &self.rooms {
            if room.degree() > MAX_CONNECTIONS {
                return Err(MapError::TooManyConnections {
                    room: room.name.clone(),
                    degree: room.degree(),
                });
            }
            let mut seen = HashSet::with_capacity(room.degree());
            for &neighbor in &room.neighbors {
                let Some(other) = self.rooms.get(neighbor) else {
                    return Err(MapError::UnknownNeighbor {
                        room: room.name.clone(),
                        neighbor: neighbor.to_string(),
                    });
                };
                if neighbor == room.id {
                    return Err(MapError::SelfLoop(room.name.clone()));
                }
                if !seen.insert(neighbor) {
                    return Err(MapError::DuplicateConnection {
                        room: room.name.clone(),
                        neighbor: other.name.clone(),
                    });
                }
                if !other.is_connected_to(room.id) {
                    return Err(MapError::Asymmetric {
                        room: room.name.clone(),
                        neighbor: other.name.clone(),
                    });
                }
            }
        }

        let connected = self
            .rooms
            .iter()
            .filter(|room| (MIN_CONNECTIONS..=MAX_CONNECTIONS).contains(&room.degree()))
            .count();
        if connected < PLAY_ROOMS - 1 {
            return Err(MapError::TooFewConnected {
                found: connected,
                needed: PLAY_ROOMS - 1,
            });
        }

        for role in [RoomRole::Start, RoomRole::End] {
            let found = self.rooms.iter().filter(|room| room.role == role).count();
            if found != 1 {
                return Err(MapError::RoleCount { role, found });
            }
        }
        for (role, index) in [
            (RoomRole::Start, self.start_index),
            (RoomRole::End, self.end_index),
        ] {
            if self.rooms.get(index).map(|room| room.role) != Some(role) {
                return Err(MapError::MisplacedRole { role, index });
            }
        }

        Ok(())
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room by id. Panics if `id` is out of range.
    pub fn room(&self, id: usize) -> &Room {
        &self.rooms[id]
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn start(&self) -> &Room {
        &self.rooms[self.start_index]
    }

    pub fn end(&self) -> &Room {
        &self.rooms[self.end_index]
    }

    /// Id of the room with this exact name
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.name == name)
    }

    /// Neighbor names of room `id`, in connection order
    pub fn neighbor_names(&self, id: usize) -> impl Iterator<Item = &str> {
        self.rooms[id]
            .neighbors
            .iter()
            .map(|&neighbor| self.rooms[neighbor].name.as_str())
    }

    /// Shortest list of rooms leading from `from` to `to`, excluding `from`.
    ///
    /// Generation does not guarantee a connected graph, so this returns
    /// `None` when `to` is unreachable.
    pub fn path_between(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let mut came_from = [None; PLAY_ROOMS];
        let mut queue = VecDeque::from([from]);
        came_from[from] = Some(from);

        while let Some(id) = queue.pop_front() {
            if id == to {
                let mut path = Vec::new();
                let mut at = to;
                while at != from {
                    path.push(at);
                    at = came_from[at]?;
                }
                path.reverse();
                return Some(path);
            }
            for &next in &self.rooms[id].neighbors {
                if came_from[next].is_none() {
                    came_from[next] = Some(id);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Whether the end room can be reached from the start room
    pub fn is_winnable(&self) -> bool {
        self.path_between(self.start_index, self.end_index).is_some()
    }
}

/// Index of the only room with `role`
fn find_role(rooms: &[Room], role: RoomRole) -> Result<usize, MapError> {
    let matches: Vec<usize> = (0..rooms.len())
        .filter(|&index| rooms[index].role == role)
        .collect();
    match matches[..] {
        [index] => Ok(index),
        _ => Err(MapError::RoleCount {
            role,
            found: matches.len(),
        }),
    }
}
