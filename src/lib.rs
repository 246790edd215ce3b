//! Turn-based grid dungeon simulation.
//!
//! The member crates hold the model (`dungeon`, `combat`, `items`, `hero`);
//! this crate wires them into a command-driven session.

pub mod config;
pub mod event_bus;
pub mod game_loop;
pub mod input;
pub mod turn_system;

pub use config::GameConfig;
pub use event_bus::{EventBus, EventCategory, EventHandler, GameEvent, LoggingHandler};
pub use game_loop::{Game, GameLoop};
pub use input::{parse_command, Command, InputEvent, InputSource, LineInput};
pub use turn_system::{TurnContext, TurnOutcome, TurnResolver, TurnState};
