use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::action::Direction;

/// Logical canvas width in pixels
pub const CANVAS_WIDTH: usize = 800;
/// Logical canvas height in pixels
pub const CANVAS_HEIGHT: usize = 600;
/// Size of one grid cell in pixels
pub const CELL_SIZE: usize = 20;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Direction the snake starts moving in
    pub initial_direction: Direction,

    // Progression
    /// Tick interval at level 1, in milliseconds
    pub initial_tick_ms: u64,
    /// How much faster each level ticks, in milliseconds
    pub tick_step_ms: u64,
    /// Fastest allowed tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// Score needed for each level-up
    pub points_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: CANVAS_WIDTH / CELL_SIZE,
            grid_height: CANVAS_HEIGHT / CELL_SIZE,
            initial_snake_length: 1,
            initial_direction: Direction::Down,
            initial_tick_ms: 100,
            tick_step_ms: 10,
            min_tick_ms: 50,
            points_per_level: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Tick interval used when a game starts
    pub fn initial_tick_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}
