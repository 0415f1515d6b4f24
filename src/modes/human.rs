use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::audio::{SoundBoard, SoundCue};
use crate::game::{GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// How often the screen is checked for pending redraws (~30 FPS)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    sounds: SoundBoard,
    should_quit: bool,
    redraw_requested: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, sounds: SoundBoard) -> Self {
        Self::with_engine(GameEngine::new(config), sounds)
    }

    pub fn with_engine(mut engine: GameEngine, sounds: SoundBoard) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            sounds,
            should_quit: false,
            redraw_requested: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        log::info!(
            "game started on a {}x{} grid",
            self.state.grid_width,
            self.state.grid_height
        );

        let result = self.run_game_loop(&mut terminal).await;
        let result = keep_loop_error(result, restore_terminal(&mut terminal));

        log::info!(
            "session ended: {} games, best score {}",
            self.metrics.games_played,
            self.metrics.high_score
        );

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut armed_interval = self.state.tick_interval;
        let mut tick_timer = new_tick_timer(armed_interval);

        let mut render_timer = interval(RENDER_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.metrics.update() {
                        self.redraw_requested = true;
                    }
                    if self.redraw_requested {
                        terminal.draw(|frame| {
                            self.renderer.render(frame, &self.state, &self.metrics);
                        }).context("Failed to draw frame")?;
                        self.redraw_requested = false;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Level-ups and restarts change the tick period
            rearm_tick_timer(&mut tick_timer, &mut armed_interval, self.state.tick_interval);
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    if !self.state.set_direction(direction) {
                        log::trace!("ignored turn {direction:?}");
                    }
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            },
            Event::Resize(..) => self.redraw_requested = true,
            _ => {}
        }
    }

    fn update_game(&mut self) {
        if !self.state.is_alive {
            return;
        }

        let result = self.engine.tick(&mut self.state);
        self.redraw_requested = true;

        if result.ate_food {
            self.sounds.play(SoundCue::Eat);
        }
        if result.leveled_up {
            log::info!(
                "level {} reached at score {}",
                self.state.level,
                self.state.score
            );
        }
        if result.terminated() {
            self.sounds.play(SoundCue::GameOver);
            self.metrics.on_game_over(&self.state);
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.redraw_requested = true;
        log::info!("game restarted");
    }
}

type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Raw mode plus alternate screen; undone again if any later step fails
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    rollback_on_error(enter_screen(), || {
        let mut stderr = stderr();
        let _ = execute!(stderr, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

fn enter_screen() -> Result<Tui> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    // Every step runs even if an earlier one fails
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("Failed to show cursor");
    raw.and(screen).and(cursor)
}

fn rollback_on_error<T>(attempt: Result<T>, rollback: impl FnOnce()) -> Result<T> {
    if attempt.is_err() {
        rollback();
    }
    attempt
}

/// The game loop's own error wins; a failed restore is only logged
fn keep_loop_error(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    if let Err(err) = cleanup {
        log::warn!("Terminal not fully restored: {err:#}");
    }
    result
}

/// Periodic timer whose first tick is one full period away
fn new_tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Restart the timer when the game's tick period moved away from the armed one
fn rearm_tick_timer(timer: &mut Interval, armed: &mut Duration, wanted: Duration) -> bool {
    if *armed == wanted {
        return false;
    }
    *armed = wanted;
    *timer = new_tick_timer(wanted);
    log::debug!("tick timer re-armed at {wanted:?}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameOutcome, Position};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::with_engine(
            GameEngine::with_seed(GameConfig::default(), 11),
            SoundBoard::silent(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.state.is_alive);
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.level, 1);
        assert!(mode.redraw_requested);
    }

    #[test]
    fn test_turn_waits_for_tick() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Left));

        assert_eq!(mode.state.direction(), Direction::Down);
        assert_eq!(mode.state.pending_direction, Some(Direction::Left));

        mode.update_game();
        assert_eq!(mode.state.direction(), Direction::Left);
    }

    #[test]
    fn test_reverse_key_ignored() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();

        assert_eq!(mode.state.direction(), Direction::Down);
        assert_eq!(mode.state.snake.head(), Position::new(20, 16));
    }

    #[test]
    fn test_game_over_freezes_and_counts() {
        let mut mode = mode();
        mode.state.food = Some(Position::new(0, 0));

        // Straight down from row 15 hits the floor on the 15th tick
        for _ in 0..20 {
            mode.update_game();
        }

        assert!(!mode.state.is_alive);
        assert!(matches!(mode.state.outcome, Some(GameOutcome::Collided(_))));
        assert_eq!(mode.state.snake.head(), Position::new(20, 29));
        assert_eq!(mode.metrics.games_played, 1);

        let frozen = mode.state.clone();
        mode.handle_event(key(KeyCode::Right));
        mode.update_game();
        assert_eq!(mode.state, frozen);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.score = 10;
        mode.state.level = 3;
        mode.state.tick_interval = Duration::from_millis(80);
        mode.state.is_alive = false;

        mode.handle_event(key(KeyCode::Char('r')));

        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.level, 1);
        assert_eq!(mode.state.tick_interval, Duration::from_millis(100));
        assert!(mode.state.is_alive);
    }

    #[test]
    fn test_quit_and_resize() {
        let mut mode = mode();
        mode.redraw_requested = false;

        mode.handle_event(Event::Resize(120, 40));
        assert!(mode.redraw_requested);

        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_timer_waits_one_period() {
        let period = Duration::from_millis(90);
        let start = Instant::now();
        let mut timer = new_tick_timer(period);

        timer.tick().await;
        assert!(start.elapsed() >= period);
    }

    #[tokio::test(start_paused = true)]
    async fn test_level_up_rearms_timer_at_new_speed() {
        let mut mode = mode();
        let mut armed = mode.state.tick_interval;
        let mut timer = new_tick_timer(armed);
        assert!(!rearm_tick_timer(&mut timer, &mut armed, mode.state.tick_interval));

        // Five meals in a row reach level 2
        for _ in 0..5 {
            let head = mode.state.snake.head();
            mode.state.food = Some(head.moved_in_direction(mode.state.direction()));
            mode.update_game();
        }
        assert_eq!(mode.state.level, 2);
        assert_eq!(mode.state.tick_interval, Duration::from_millis(90));

        let rearmed_at = Instant::now();
        assert!(rearm_tick_timer(&mut timer, &mut armed, mode.state.tick_interval));
        assert_eq!(armed, Duration::from_millis(90));

        timer.tick().await;
        let waited = rearmed_at.elapsed();
        assert!(waited >= Duration::from_millis(90), "{waited:?}");
        assert!(waited < Duration::from_millis(100), "{waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_rearms_timer_back_to_initial_speed() {
        let mut mode = mode();
        let mut armed = Duration::from_millis(60);
        let mut timer = new_tick_timer(armed);

        mode.handle_event(key(KeyCode::Char('r')));
        let rearmed_at = Instant::now();
        assert!(rearm_tick_timer(&mut timer, &mut armed, mode.state.tick_interval));

        timer.tick().await;
        let waited = rearmed_at.elapsed();
        assert!(waited >= Duration::from_millis(100), "{waited:?}");
        assert!(waited < Duration::from_millis(110), "{waited:?}");
    }

    #[test]
    fn test_failed_setup_rolls_back() {
        let mut rolled_back = false;
        let attempt: Result<()> = Err(anyhow::anyhow!("no alternate screen"));

        let err = rollback_on_error(attempt, || rolled_back = true).unwrap_err();

        assert!(rolled_back);
        assert_eq!(err.to_string(), "no alternate screen");
    }

    #[test]
    fn test_successful_setup_keeps_terminal() {
        let mut rolled_back = false;
        let value = rollback_on_error(Ok(7), || rolled_back = true).unwrap();

        assert_eq!(value, 7);
        assert!(!rolled_back);
    }

    #[test]
    fn test_loop_error_survives_failed_restore() {
        let result = keep_loop_error(
            Err(anyhow::anyhow!("draw failed")),
            Err(anyhow::anyhow!("raw mode stuck")),
        );
        assert_eq!(result.unwrap_err().to_string(), "draw failed");

        let result = keep_loop_error(Ok(()), Err(anyhow::anyhow!("raw mode stuck")));
        assert!(result.is_ok());
    }
}
