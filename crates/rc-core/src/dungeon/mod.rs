//! Room graph
//!
//! Contains the room model, the fixed-size map and the random map generator.

mod generation;
mod map;
mod room;

pub use generation::{GenerationError, generate_map, is_graph_full};
pub use map::{Map, MapError};
pub use room::{Room, RoomRecord, RoomRole};
