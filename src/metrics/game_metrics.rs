use std::time::{Duration, Instant};

use crate::game::GameState;

/// Per-session play statistics. Lives only as long as the process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub best_level: u32,
    pub games_played: u32,
    /// Whether the last finished game beat the previous high score
    pub new_best: bool,
    /// Frozen once a game ends so the clock stops on the overlay
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            best_level: 0,
            games_played: 0,
            new_best: false,
            running: true,
        }
    }

    /// Refresh the elapsed time; returns true when the displayed clock changed
    pub fn update(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let previous = self.elapsed_time.as_secs();
        self.elapsed_time = self.start_time.elapsed();
        self.elapsed_time.as_secs() != previous
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.new_best = false;
        self.running = true;
    }

    pub fn on_game_over(&mut self, state: &GameState) {
        self.elapsed_time = self.start_time.elapsed();
        self.running = false;
        self.games_played += 1;
        self.new_best = state.score > self.high_score;
        self.high_score = self.high_score.max(state.score);
        self.best_level = self.best_level.max(state.level);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
