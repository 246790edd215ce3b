//src/dungeon/src/lib.rs
//! Board, entity placement, procedural levels and pursuit paths.

pub mod coord;
pub mod entity;
pub mod generator;
pub mod grid;
pub mod level;
pub mod path;
pub mod rng;

pub use coord::{Coord, Direction, SPAWN};
pub use entity::{Entity, EntityId, EntityKind, EntityRecord, EntityStore};
pub use generator::{
    GenerationConfig, GenerationReport, LevelGenerator, PlacementCount, MAX_BOARD_SIDE,
    MAX_PLACEMENTS,
};
pub use grid::{Cell, Grid};
pub use level::Level;
pub use path::find_path;
pub use rng::DungeonRng;
