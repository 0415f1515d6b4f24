use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;
use super::progression::STARTING_LEVEL;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction.
    /// Extra segments trail behind the head.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        body.push_back(segment);

        for _ in 1..length {
            segment = segment.moved_by(dx, dy);
            body.push_back(segment);
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Check if position is any cell of the snake, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head, dropping the tail unless growing
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The snake crashed
    Collided(CollisionType),
    /// The snake filled the whole board
    Won,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Current food cell; `None` only once the board is full
    pub food: Option<Position>,
    /// Direction requested since the last tick
    pub pending_direction: Option<Direction>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    pub tick_interval: Duration,
    pub steps: u32,
    pub is_alive: bool,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            pending_direction: None,
            grid_width,
            grid_height,
            score: 0,
            level: STARTING_LEVEL,
            tick_interval,
            steps: 0,
            is_alive: true,
            outcome: None,
        }
    }

    /// Current movement direction
    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Request a turn for the next tick.
    ///
    /// Returns false when the request was ignored: the game is over, or the
    /// direction would reverse the snake onto itself.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.is_alive || self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Whether the game reached its terminal state
    pub fn is_over(&self) -> bool {
        !self.is_alive
    }

    pub(crate) fn finish(&mut self, outcome: GameOutcome) {
        self.is_alive = false;
        self.pending_direction = None;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(snake: Snake) -> GameState {
        GameState::new(
            snake,
            Some(Position::new(10, 10)),
            20,
            20,
            Duration::from_millis(100),
        )
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Some(Position::new(3, 5)));
    }

    #[test]
    fn test_single_segment_snake() {
        let snake = Snake::new(Position::new(20, 15), Direction::Down, 1);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail().unwrap());
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance_to(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Some(Position::new(4, 5)));

        snake.advance_to(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Some(Position::new(4, 5)));
    }

    #[test]
    fn test_occupancy_includes_head_and_tail() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.occupies(Position::new(5, 5)));
        assert!(snake.occupies(Position::new(3, 5)));
        assert!(!snake.occupies(Position::new(10, 10)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = state_with(Snake::new(Position::new(5, 5), Direction::Right, 3));

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_set_direction_rejects_reverse() {
        let mut state = state_with(Snake::new(Position::new(5, 5), Direction::Up, 1));

        assert!(!state.set_direction(Direction::Down));
        assert_eq!(state.pending_direction, None);
        assert_eq!(state.direction(), Direction::Up);

        assert!(state.set_direction(Direction::Left));
        assert_eq!(state.pending_direction, Some(Direction::Left));
        // Still compared against the applied direction, not the pending one
        assert!(!state.set_direction(Direction::Down));
        assert_eq!(state.pending_direction, Some(Direction::Left));
    }

    #[test]
    fn test_set_direction_ignored_when_over() {
        let mut state = state_with(Snake::new(Position::new(5, 5), Direction::Up, 1));
        state.finish(GameOutcome::Collided(CollisionType::Wall));

        assert!(!state.set_direction(Direction::Left));
        assert_eq!(state.pending_direction, None);
        assert!(state.is_over());
    }
}
