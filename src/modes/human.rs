use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use tokio::time::interval;
use tracing::{debug, info};

use super::session::PlaySession;
use super::tui::{self, Tui};
use crate::control::{ControlSource, ManualControl};
use crate::game::{Command, GameConfig, GameState, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::{Hud, Renderer};
use crate::score::ScoreStore;

/// Keyboard play
pub struct HumanMode {
    session: PlaySession,
    control: ManualControl,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_rate_hz: u32,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        let tick_rate_hz = config.tick_rate_hz;
        let session = PlaySession::start(config, store).context("Failed to start game")?;

        Ok(Self {
            session,
            control: ManualControl::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_rate_hz,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = tui::enter()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        tui::restore(&mut terminal)?;

        if let Ok(snapshot) = self.session.snapshot() {
            info!(
                score = snapshot.score,
                high_score = snapshot.high_score,
                games = self.session.metrics().games_played,
                "session ended"
            );
        }
        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(tui::tick_interval(self.tick_rate_hz));
        let mut render_timer = interval(tui::RENDER_INTERVAL);
        let hud = Hud::new(self.control.name());

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.session.tick(&mut self.control)?;
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    let snapshot = self.session.snapshot()?;
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, self.session.metrics(), &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                // Turns only count while playing
                KeyAction::Command(command @ Command::Turn(_)) => {
                    if self.session.snapshot()?.state != GameState::Playing {
                        debug!(?command, "turn ignored outside play");
                    } else if !self.control.push(command) {
                        debug!(?command, "input buffer full, key dropped");
                    }
                }
                // Pause and restart take effect immediately
                KeyAction::Command(command) => {
                    let outcome = self.session.apply(Some(command))?;
                    debug!(?command, ?outcome, "control key");
                    if matches!(outcome, StepOutcome::Paused | StepOutcome::Restarted) {
                        self.control.clear();
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::score::MemoryScoreStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        let config = GameConfig::small().with_seed(11);
        HumanMode::new(config, Box::new(MemoryScoreStore::new(4))).unwrap()
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        let snapshot = mode.session.snapshot().unwrap();
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.high_score, 4);
    }

    #[test]
    fn test_turn_keys_are_buffered() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Up)).unwrap();
        mode.handle_event(press(KeyCode::Char('a'))).unwrap();
        assert_eq!(mode.control.pending(), 2);
    }

    #[test]
    fn test_pause_key_applies_immediately() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Char('p'))).unwrap();
        assert_eq!(mode.session.snapshot().unwrap().state, GameState::Paused);

        mode.handle_event(press(KeyCode::Char(' '))).unwrap();
        assert_eq!(mode.session.snapshot().unwrap().state, GameState::Playing);
    }

    #[test]
    fn test_turns_while_paused_are_dropped() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Up)).unwrap();
        mode.handle_event(press(KeyCode::Char('p'))).unwrap();
        assert_eq!(mode.control.pending(), 0);

        mode.handle_event(press(KeyCode::Left)).unwrap();
        assert_eq!(mode.control.pending(), 0);

        mode.handle_event(press(KeyCode::Char('p'))).unwrap();
        mode.session.tick(&mut mode.control).unwrap();
        assert_eq!(mode.session.snapshot().unwrap().direction, Direction::Right);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Char('q'))).unwrap();
        assert!(mode.should_quit);
    }
}
