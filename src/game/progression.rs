//! Level progression - score thresholds and tick speed

use std::time::Duration;

use super::config::GameConfig;

/// Level every game starts on
pub const STARTING_LEVEL: u32 = 1;

/// Level reached with the given score
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    if points_per_level == 0 {
        return STARTING_LEVEL;
    }
    STARTING_LEVEL + score / points_per_level
}

/// Next (faster) tick interval after one level-up, never below the floor
pub fn faster_interval(current: Duration, config: &GameConfig) -> Duration {
    let floor = Duration::from_millis(config.min_tick_ms);
    current
        .saturating_sub(Duration::from_millis(config.tick_step_ms))
        .max(floor)
}
