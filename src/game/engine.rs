use super::{
    config::GameConfig,
    progression,
    state::{CollisionType, GameOutcome, GameState, Position, Snake},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random probes before falling back to scanning free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// What happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether eating raised the level (and sped up the tick)
    pub leveled_up: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Set on the tick that ends the game, and on every tick after it
    pub outcome: Option<GameOutcome>,
}

impl TickResult {
    /// Whether the game is over after this tick
    pub fn terminated(&self) -> bool {
        self.outcome.is_some()
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a fresh game: snake centred on the board, food on a free cell
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            self.config.initial_direction,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food_avoid_snake(&snake);

        GameState::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
            self.config.initial_tick_interval(),
        )
    }

    /// Advance the game by one cell.
    ///
    /// Applies the pending direction first. A finished game is left untouched.
    pub fn tick(&mut self, state: &mut GameState) -> TickResult {
        if !state.is_alive {
            return TickResult {
                outcome: state.outcome,
                ..TickResult::default()
            };
        }

        if let Some(direction) = state.pending_direction.take() {
            if !state.snake.direction.is_opposite(direction) {
                state.snake.direction = direction;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.steps += 1;

        if let Some(collision_type) = self.check_collision(state, new_head) {
            let outcome = GameOutcome::Collided(collision_type);
            state.finish(outcome);
            log::info!(
                "game over ({:?}) at {:?}: score {}, level {}",
                collision_type,
                new_head,
                state.score,
                state.level
            );

            return TickResult {
                collision_type: Some(collision_type),
                outcome: Some(outcome),
                ..TickResult::default()
            };
        }

        let ate_food = state.food == Some(new_head);
        state.snake.advance_to(new_head, ate_food);

        if !ate_food {
            return TickResult::default();
        }

        state.food = self.spawn_food_avoid_snake(&state.snake);
        state.score += 1;
        let leveled_up = self.check_level_up(state);

        if state.food.is_none() {
            state.finish(GameOutcome::Won);
            log::info!("board cleared: score {}, level {}", state.score, state.level);
        }

        TickResult {
            ate_food,
            leveled_up,
            collision_type: None,
            outcome: state.outcome,
        }
    }

    /// Raise the level when the score hits a threshold
    fn check_level_up(&self, state: &mut GameState) -> bool {
        let level = progression::level_for_score(state.score, self.config.points_per_level);
        if level <= state.level {
            return false;
        }

        state.level = level;
        state.tick_interval = progression::faster_interval(state.tick_interval, &self.config);
        log::debug!(
            "level {} reached, tick interval {:?}",
            state.level,
            state.tick_interval
        );
        true
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail still counts: it has not moved away yet
        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position, or `None` if the board is full
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        if snake.len() >= self.config.cell_count() {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        // Crowded board: pick directly among the free cells
        let free: Vec<Position> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}
