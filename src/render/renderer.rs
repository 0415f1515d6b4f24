use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{CollisionType, GameOutcome, GameState, Position};
use crate::metrics::GameMetrics;

/// Terminal columns used by one grid cell
const CELL_COLUMNS: u16 = 2;
const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 1;
const OVERLAY_WIDTH: u16 = 40;
const OVERLAY_HEIGHT: u16 = 11;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let board_width = state.grid_width as u16 * CELL_COLUMNS + 2;
        let board_height = state.grid_height as u16 + 2;

        let [header, board, footer] = Layout::vertical([
            Constraint::Length(HEADER_ROWS),
            Constraint::Length(board_height),
            Constraint::Length(FOOTER_ROWS),
        ])
        .flex(Flex::Center)
        .areas(frame.area());

        let [header] = Layout::horizontal([Constraint::Length(board_width)])
            .flex(Flex::Center)
            .areas(header);
        let [board] = Layout::horizontal([Constraint::Length(board_width)])
            .flex(Flex::Center)
            .areas(board);

        frame.render_widget(self.render_stats(state, metrics, board_width), header);

        if state.is_alive {
            frame.render_widget(self.render_grid(state), board);
        } else {
            // The overlay replaces the board entirely
            let overlay = centered(board, OVERLAY_WIDTH, OVERLAY_HEIGHT);
            frame.render_widget(Clear, board);
            frame.render_widget(self.render_game_over(state, metrics), overlay);
        }

        frame.render_widget(self.render_controls(), footer);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let head = state.snake.head();
        let body: HashSet<Position> = state.snake.body.iter().copied().collect();

        let lines: Vec<Line> = (0..state.grid_height as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid_width as i32)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        if pos == head {
                            Span::styled(
                                "██",
                                Style::default()
                                    .fg(Color::LightGreen)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if body.contains(&pos) {
                            Span::styled("██", Style::default().fg(Color::Green))
                        } else if state.food == Some(pos) {
                            Span::styled("██", Style::default().fg(Color::Red))
                        } else {
                            Span::raw("  ")
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        width: u16,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let left = vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value),
        ];
        let middle = vec![
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled("Best: ", label),
            Span::styled(format_best(metrics), Style::default().fg(Color::White)),
        ];
        let right = vec![
            Span::styled("Level: ", label),
            Span::styled(state.level.to_string(), value),
        ];

        // Score hugs the left edge, level the right, like the arcade HUD
        let used: usize = [&left, &middle, &right]
            .iter()
            .flat_map(|spans| spans.iter())
            .map(Span::width)
            .sum();
        let inner = width.saturating_sub(2) as usize;
        let gap = inner.saturating_sub(used) / 2;

        let mut spans = left;
        spans.push(Span::raw(" ".repeat(gap)));
        spans.extend(middle);
        spans.push(Span::raw(" ".repeat(inner.saturating_sub(used + gap))));
        spans.extend(right);

        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let (title, color, reason) = match state.outcome {
            Some(GameOutcome::Won) => ("YOU WIN!", Color::Green, "The board is full"),
            Some(GameOutcome::Collided(CollisionType::Wall)) => {
                ("GAME OVER!", Color::Red, "Hit the wall")
            }
            Some(GameOutcome::Collided(CollisionType::SelfCollision)) => {
                ("GAME OVER!", Color::Red, "Bit your own tail")
            }
            None => ("GAME OVER!", Color::Red, ""),
        };

        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", label),
                Span::styled(state.score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Final Level: ", label),
                Span::styled(state.level.to_string(), value),
            ]),
        ];

        if metrics.new_best {
            text.push(Line::from(Span::styled(
                "New best!",
                Style::default().fg(Color::Cyan),
            )));
        } else {
            text.push(Line::from(""));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Best score and best level of the session, once a game has finished
fn format_best(metrics: &GameMetrics) -> String {
    if metrics.games_played == 0 {
        return "-".to_string();
    }
    format!("{} (L{})", metrics.high_score, metrics.best_level)
}

/// A `width`×`height` rectangle centred in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
