//! Random map generation
//!
//! Picks `PLAY_ROOMS` names from the name pool with a Fisher-Yates shuffle,
//! assigns the start and end roles to the first and last picks, then keeps
//! adding random connections until all but one room have a comfortable
//! number of neighbors:
//! 1. Pick a random room with spare capacity
//! 2. Pick a random partner with spare capacity that is not already linked
//! 3. Link both ways
//!
//! Once two rooms are full, at most `PLAY_ROOMS - 2` rooms can ever settle
//! and the stop condition is out of reach. Wiring is then cleared and starts
//! over with the same RNG. Attempts across all restarts are capped at
//! `MAX_GENERATION_ATTEMPTS`.

use thiserror::Error;
use tracing::{debug, info};

use super::map::{Map, MapError};
use super::room::{Room, RoomRole};
use crate::rng::GameRng;
use crate::{MAX_CONNECTIONS, MAX_GENERATION_ATTEMPTS, MIN_CONNECTIONS, PLAY_ROOMS, ROOM_NAMES};

/// Map generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("gave up connecting rooms after {attempts} attempts")]
    Stalled { attempts: usize },

    #[error("generated map is invalid: {0}")]
    Invalid(#[from] MapError),
}

/// Generate a new random map
pub fn generate_map(rng: &mut GameRng) -> Result<Map, GenerationError> {
    let mut rooms = init_rooms(rng);
    populate_connections(&mut rooms, rng, MAX_GENERATION_ATTEMPTS)?;
    let map = Map::new(rooms)?;
    info!(
        seed = rng.seed(),
        start = %map.start().name,
        end = %map.end().name,
        "generated map"
    );
    Ok(map)
}

/// Whether generation may stop: all but one room have a degree in
/// `[MIN_CONNECTIONS, MAX_CONNECTIONS)`.
pub fn is_graph_full(rooms: &[Room]) -> bool {
    let settled = rooms
        .iter()
        .filter(|room| (MIN_CONNECTIONS..MAX_CONNECTIONS).contains(&room.degree()))
        .count();
    settled >= PLAY_ROOMS - 1
}

/// Create unconnected rooms with shuffled names
fn init_rooms(rng: &mut GameRng) -> [Room; PLAY_ROOMS] {
    let mut order: Vec<usize> = (0..ROOM_NAMES.len()).collect();
    rng.shuffle(&mut order);

    std::array::from_fn(|id| {
        let role = match id {
            0 => RoomRole::Start,
            id if id == PLAY_ROOMS - 1 => RoomRole::End,
            _ => RoomRole::Mid,
        };
        Room::new(id, ROOM_NAMES[order[id]], role)
    })
}

/// Whether `is_graph_full` can no longer be reached by adding connections:
/// more than one room is full, or no pair of rooms can be linked.
fn is_dead_end(rooms: &[Room]) -> bool {
    let full = rooms.iter().filter(|room| !room.has_capacity()).count();
    let linkable = rooms
        .iter()
        .any(|x| x.has_capacity() && rooms.iter().any(|y| can_connect(x, y)));
    full > 1 || !linkable
}

fn populate_connections(
    rooms: &mut [Room],
    rng: &mut GameRng,
    max_attempts: usize,
) -> Result<(), GenerationError> {
    let mut attempts = 0;
    let mut restarts = 0;
    while !is_graph_full(rooms) {
        if attempts == max_attempts {
            return Err(GenerationError::Stalled { attempts });
        }
        if is_dead_end(rooms) {
            restarts += 1;
            debug!(attempts, restarts, "dead end, clearing connections");
            for room in rooms.iter_mut() {
                room.neighbors.clear();
            }
        }
        attempts += 1;
        add_random_connection(rooms, rng);
    }
    debug!(attempts, restarts, "connections populated");
    Ok(())
}

fn can_connect(x: &Room, y: &Room) -> bool {
    x.id != y.id && y.has_capacity() && !x.is_connected_to(y.id)
}

/// Try to add one random connection. Returns false when the drawn room
/// has no eligible partner.
fn add_random_connection(rooms: &mut [Room], rng: &mut GameRng) -> bool {
    let open: Vec<usize> = rooms
        .iter()
        .filter(|room| room.has_capacity())
        .map(|room| room.id)
        .collect();
    let Some(&x) = rng.choose(&open) else {
        return false;
    };

    let partners: Vec<usize> = open
        .iter()
        .copied()
        .filter(|&y| can_connect(&rooms[x], &rooms[y]))
        .collect();
    let Some(&y) = rng.choose(&partners) else {
        debug!(room = %rooms[x].name, "no eligible partner");
        return false;
    };

    connect(rooms, x, y);
    true
}

fn connect(rooms: &mut [Room], x: usize, y: usize) {
    rooms[x].add_neighbor(y);
    rooms[y].add_neighbor(x);
    debug!(from = %rooms[x].name, to = %rooms[y].name, "connected");
}
