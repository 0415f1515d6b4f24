//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal loop in `modes` drives it one tick at a time.

pub mod action;
pub mod config;
pub mod engine;
pub mod progression;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use state::{CollisionType, GameOutcome, GameState, Position, Snake};
