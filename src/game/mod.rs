//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A front end drives a [`GameSession`] with commands and ticks, and draws its snapshots.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Axis, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, TickOutcome, TickResult};
pub use error::ConfigError;
pub use session::{Command, GamePhase, GameSession, Snapshot};
pub use state::{GameState, Position, Snake};
