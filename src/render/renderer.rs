use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Direction, GamePhase, Position, Snapshot};
use crate::metrics::GameMetrics;

/// Stateless drawer for session snapshots
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(snapshot);
        frame.render_widget(grid, game_area);

        let overlay = match snapshot.phase {
            GamePhase::Menu => Some(self.render_menu()),
            GamePhase::Paused => Some(self.render_paused()),
            GamePhase::GameOver => Some(self.render_game_over(snapshot)),
            GamePhase::Playing => None,
        };
        if let Some(overlay) = overlay {
            let popup = centered(game_area, 40, 11);
            frame.render_widget(Clear, popup);
            frame.render_widget(overlay, popup);
        }

        let controls = self.render_controls(snapshot);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let head = snapshot.head();
        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    Span::styled(
                        head_glyph(snapshot.heading),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.speed_level.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Arrow keys or WASD to move"),
            Line::from("Eat the food to grow"),
            Line::from("Edges wrap around; don't bite yourself"),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                key_span("Enter", Color::Green),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        overlay(text, Color::Green)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                key_span("SPACE", Color::Yellow),
                Span::styled(" to resume", Style::default().fg(Color::Gray)),
            ]),
        ];

        overlay(text, Color::Yellow)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if snapshot.is_new_high_score() {
            text.push(Line::from(Span::styled(
                "New High Score!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            key_span("Enter", Color::Green),
            Span::styled(" to replay or ", Style::default().fg(Color::Gray)),
            key_span("M", Color::Cyan),
            Span::styled(" for menu", Style::default().fg(Color::Gray)),
        ]));

        overlay(text, Color::Red)
    }

    fn render_controls(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::raw(snapshot.snake_len().to_string()),
            Span::raw(" | "),
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" menu | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn head_glyph(heading: Direction) -> &'static str {
    match heading {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
}

fn key_span(key: &'static str, color: Color) -> Span<'static> {
    Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn overlay(text: Vec<Line<'static>>, border: Color) -> Paragraph<'static> {
    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
}

/// A `width` x `height` rect in the middle of `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
