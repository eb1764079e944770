//! Rockfall: a push-and-fall tile puzzle.
//!
//! The simulation core lives in `domain` (tiles, gravity, grid, move rules)
//! and `sim` (world state, tick pipeline, level sources). Rendering, key
//! capture and the frame loop belong to the binary.

pub mod config;
pub mod domain;
pub mod sim;

pub use domain::tile::{RawTile, Tile, TileKind};
pub use sim::event::GameEvent;
pub use sim::level::{transform, Level, LevelError};
pub use sim::queue::Direction;
pub use sim::world::WorldState;
