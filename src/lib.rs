//! Wrap Snake - a terminal Snake game on a wrap-around grid
//!
//! This library provides:
//! - Core game logic and session phases (game module)
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - Per-game metrics (metrics module)
//! - The interactive terminal mode and its tick scheduler (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
