//! Watch an automated policy play
//!
//! # Controls
//!
//! - P/Space: Pause/unpause
//! - R: Restart after game over
//! - 1-4: Speed control (1=slow, 2=configured tick rate, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{interval, Interval};
use tracing::info;

use super::session::PlaySession;
use super::tui::{self, Tui};
use crate::agent::Policy;
use crate::control::{AgentControl, ControlSource};
use crate::game::{Command, GameConfig, StepOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::{Hud, Renderer};
use crate::score::ScoreStore;

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// Slow: 2 Hz (500ms per step)
    Slow,
    /// The configured tick rate
    Normal,
    /// Fast: 20 Hz (50ms per step)
    Fast,
    /// Very Fast: 60 Hz (16ms per step)
    VeryFast,
}

impl PlaybackSpeed {
    fn tick_interval(&self, tick_rate_hz: u32) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => tui::tick_interval(tick_rate_hz),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }

    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('1') => Some(Self::Slow),
            KeyCode::Char('2') => Some(Self::Normal),
            KeyCode::Char('3') => Some(Self::Fast),
            KeyCode::Char('4') => Some(Self::VeryFast),
            _ => None,
        }
    }
}

/// TUI mode where a policy supplies every command
pub struct AgentPlayMode<P: Policy> {
    session: PlaySession,
    control: AgentControl<P>,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_rate_hz: u32,
    speed: PlaybackSpeed,
    should_quit: bool,
}

impl<P: Policy> AgentPlayMode<P> {
    /// `auto_reset` restarts the game by itself after each game over
    pub fn new(
        config: GameConfig,
        policy: P,
        store: Box<dyn ScoreStore>,
        auto_reset: bool,
    ) -> Result<Self> {
        let tick_rate_hz = config.tick_rate_hz;
        let session = PlaySession::start(config, store).context("Failed to start game")?;
        info!(policy = policy.name(), auto_reset, "agent play started");

        Ok(Self {
            session,
            control: AgentControl::new(policy).with_auto_reset(auto_reset),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_rate_hz,
            speed: PlaybackSpeed::Normal,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = tui::enter()?;
        let result = self.run_playback_loop(&mut terminal).await;
        tui::restore(&mut terminal)?;

        info!(
            episodes = self.session.engine().episodes_started(),
            high_score = self.session.engine().high_score(),
            "agent play ended"
        );
        result
    }

    async fn run_playback_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval(self.tick_rate_hz));
        let mut render_timer = interval(tui::RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if let StepOutcome::Restarted = self.session.tick(&mut self.control)? {
                        info!(episode = self.session.engine().episodes_started(), "episode restarted");
                    }
                }

                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    let snapshot = self.session.snapshot()?;
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, self.session.metrics(), &hud);
                    }).context("Failed to draw frame")?;
                }

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

    fn hud(&self) -> Hud {
        Hud::new(format!("agent: {}", self.control.name())).with_detail(format!(
            "Episode {} | Speed: {}",
            self.session.engine().episodes_started(),
            self.speed.as_str()
        ))
    }

    /// Keys never steer; only pause, restart, speed and quit apply
    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            if let Some(speed) = PlaybackSpeed::from_key(key.code) {
                self.change_speed(speed, tick_timer);
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Command(Command::Turn(_)) | KeyAction::None => {}
                KeyAction::Command(command) => {
                    self.session.apply(Some(command))?;
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
            }
        }

        Ok(())
    }

    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval(self.tick_rate_hz));
    }
}
