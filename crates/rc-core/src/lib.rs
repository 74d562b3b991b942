//! rc-core: Core game logic for roomcrawl
//!
//! Builds the room graph, resolves rooms by name, and runs the traversal
//! from the start room to the end room. Reading and writing room files
//! lives in `rc-save`; the only file this crate touches is the clock's
//! side file.

pub mod clock;
pub mod dungeon;
pub mod navigator;

mod consts;
mod rng;

pub use consts::*;
pub use navigator::{Journey, NavError, Navigator, StepOutcome};
pub use rng::GameRng;
