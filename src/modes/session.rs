use anyhow::Result;
use tracing::info;

use crate::control::ControlSource;
use crate::game::{
    Command, EngineError, GameConfig, GameState, SimulationEngine, Snapshot, StepOutcome,
};
use crate::metrics::GameMetrics;
use crate::score::{load_or_default, save_or_warn, ScoreStore};

/// An engine plus the bookkeeping every interactive mode does around it
pub struct PlaySession {
    engine: SimulationEngine,
    metrics: GameMetrics,
    store: Box<dyn ScoreStore>,
}

impl PlaySession {
    /// Load the high score, build the engine and start the first episode
    pub fn start(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        let high_score = load_or_default(store.as_ref());
        let mut engine = SimulationEngine::new(config, high_score)?;
        engine.reset()?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            store,
        })
    }

    /// Pull at most one command from `control` and feed it to the engine
    ///
    /// While paused only a pause toggle counts; any other command is
    /// consumed and dropped.
    pub fn tick<C: ControlSource + ?Sized>(&mut self, control: &mut C) -> Result<StepOutcome> {
        let snapshot = self.snapshot()?;
        let command = control.next_command(&snapshot);
        if snapshot.state == GameState::Paused && command != Some(Command::TogglePause) {
            return Ok(StepOutcome::Ignored);
        }
        self.apply(command)
    }

    /// Feed a command straight to the engine, outside the tick schedule
    pub fn apply(&mut self, command: Option<Command>) -> Result<StepOutcome> {
        let outcome = self.engine.step(command)?;
        self.record(outcome);
        Ok(outcome)
    }

    fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Ticked(result) => {
                if let Some(score) = result.new_high_score {
                    info!(score, "new high score");
                    save_or_warn(self.store.as_mut(), score);
                }
                if result.terminated() {
                    self.metrics.on_game_over(self.engine.score());
                }
            }
            StepOutcome::Paused => self.metrics.on_pause(),
            StepOutcome::Resumed => self.metrics.on_resume(),
            StepOutcome::Restarted => self.metrics.on_game_start(),
            StepOutcome::Ignored => {}
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }
}
