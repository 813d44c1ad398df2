use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, GameState, Snapshot};
use crate::metrics::GameMetrics;

/// What occupies a grid cell on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Head,
    Body,
    Food,
    Obstacle,
    Empty,
}

impl Glyph {
    fn span(self) -> Span<'static> {
        match self {
            // Snake head - distinct color
            Glyph::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Glyph::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            Glyph::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Glyph::Obstacle => Span::styled("# ", Style::default().fg(Color::Gray)),
            Glyph::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Per-frame labels the driving mode adds on top of the snapshot
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Who is steering, e.g. "manual" or a policy name
    pub controller: String,
    /// Extra right-hand header text (playback speed, episode count)
    pub detail: Option<String>,
}

impl Hud {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics, hud: &Hud) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], snapshot, metrics, hud);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.state == GameState::GameOver {
            let game_over = self.render_game_over(game_area, snapshot);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(game_area, snapshot);
            frame.render_widget(grid, game_area);
        }

        let controls = self.render_controls(chunks[2], snapshot.state);
        frame.render_widget(controls, chunks[2]);
    }

    /// Classify every cell of the snapshot, row by row
    pub fn glyphs(snapshot: &Snapshot) -> Vec<Vec<Glyph>> {
        let head = snapshot.head();
        let body: HashSet<Cell> = snapshot.snake.iter().copied().collect();

        (0..snapshot.grid_height as i32)
            .map(|y| {
                (0..snapshot.grid_width as i32)
                    .map(|x| {
                        let cell = Cell::new(x, y);
                        if head == Some(cell) {
                            Glyph::Head
                        } else if body.contains(&cell) {
                            Glyph::Body
                        } else if cell == snapshot.food {
                            Glyph::Food
                        } else if snapshot.obstacles.binary_search(&cell).is_ok() {
                            Glyph::Obstacle
                        } else {
                            Glyph::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn render_grid(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let mut lines: Vec<Line> = Self::glyphs(snapshot)
            .into_iter()
            .map(|row| Line::from(row.into_iter().map(Glyph::span).collect::<Vec<_>>()))
            .collect();

        let title = if snapshot.state == GameState::Paused {
            lines.insert(
                0,
                Line::from(Span::styled(
                    "PAUSED",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
            );
            " Snake (paused) "
        } else {
            " Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        snapshot: &Snapshot,
        metrics: &GameMetrics,
        hud: &Hud,
    ) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.snake.len().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(hud.controller.clone(), Style::default().fg(Color::Cyan)),
        ];
        if let Some(detail) = &hud.detail {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(detail.clone(), Style::default().fg(Color::Gray)));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let reason = snapshot
            .end_reason
            .map(|reason| format!("The snake {reason}"))
            .unwrap_or_default();

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
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
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if snapshot.score > 0 && snapshot.score >= snapshot.high_score {
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
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
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect, state: GameState) -> Paragraph<'_> {
        let pause_label = if state == GameState::Paused {
            " to resume | "
        } else {
            " to pause | "
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw("/"),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(pause_label),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, Direction, EndReason};
    use ratatui::{Terminal, backend::TestBackend};

    fn snapshot(state: GameState) -> Snapshot {
        Snapshot {
            grid_width: 6,
            grid_height: 4,
            snake: vec![Cell::new(2, 1), Cell::new(1, 1)],
            direction: Direction::Right,
            food: Cell::new(4, 2),
            obstacles: vec![Cell::new(0, 3), Cell::new(5, 0)],
            score: 2,
            high_score: 7,
            ticks: 12,
            state,
            end_reason: None,
        }
    }

    fn draw(snapshot: &Snapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let hud = Hud::new("manual").with_detail("x1");
        terminal
            .draw(|frame| renderer.render(frame, snapshot, &metrics, &hud))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_glyphs() {
        let glyphs = Renderer::glyphs(&snapshot(GameState::Playing));
        assert_eq!(glyphs.len(), 4);
        assert_eq!(glyphs[0].len(), 6);
        assert_eq!(glyphs[1][2], Glyph::Head);
        assert_eq!(glyphs[1][1], Glyph::Body);
        assert_eq!(glyphs[2][4], Glyph::Food);
        assert_eq!(glyphs[3][0], Glyph::Obstacle);
        assert_eq!(glyphs[0][5], Glyph::Obstacle);
        assert_eq!(glyphs[0][0], Glyph::Empty);
    }

    #[test]
    fn test_header_shows_scores() {
        let screen = draw(&snapshot(GameState::Playing));
        assert!(screen.contains("Score: 2"));
        assert!(screen.contains("High: 7"));
        assert!(screen.contains("Length: 2"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_paused_banner() {
        let screen = draw(&snapshot(GameState::Paused));
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("to resume"));
    }

    #[test]
    fn test_game_over_panel() {
        let mut snap = snapshot(GameState::GameOver);
        snap.end_reason = Some(EndReason::Collision(CollisionType::Wall));
        let screen = draw(&snap);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("hit a wall"));
        assert!(screen.contains("High Score: 7"));
        assert!(screen.contains("to restart"));
    }
}
