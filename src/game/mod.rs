//! Core game logic for Snake on a round board
//!
//! This module holds the lattice geometry, the snake, the food and the
//! fixed-tick loop. It performs no I/O of its own; everything external goes
//! through the collaborator traits in [`crate::platform`] and [`crate::storage`].

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Axis, Direction, Input};
pub use config::{GameConfig, MAX_BORDER_RADIUS};
pub use engine::{GameEnd, GameEngine, GameOverReport, StepInfo, TickOutcome};
pub use food::{Food, Placement};
pub use state::{GamePhase, GameState, Position, Snake, is_inside};
