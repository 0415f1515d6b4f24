//! Snake Arcade - classic single-player snake for the terminal
//!
//! This library provides:
//! - Core game logic: movement, collisions, food, levels (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering with ratatui (render module)
//! - Sound cues (audio module)
//! - Session statistics (metrics module)
//! - The interactive loop that ties them together (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
