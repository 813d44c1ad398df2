use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{
    ConfigError, Direction, EngineError, GameConfig, GameState, SimulationEngine, Snapshot,
    TickResult,
};

/// Reward shaping for automated training runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,
    /// Penalty for dying
    pub death_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
        }
    }
}

impl RewardConfig {
    pub fn reward_for(&self, result: &TickResult) -> f32 {
        if result.end.is_some() && !result.ate_food {
            return self.death_penalty;
        }
        let mut reward = self.step_penalty;
        if result.ate_food {
            reward += self.food_reward;
        }
        reward
    }
}

/// Episodic wrapper around the engine for automated agents
///
/// Wraps the simulation engine and provides an RL-style interface:
/// - `reset` starts a fresh episode even if the previous one is unfinished
/// - `step` advances one tick and reports a shaped reward
pub struct AgentEnvironment {
    config: GameConfig,
    rewards: RewardConfig,
    seeder: StdRng,
    engine: SimulationEngine,
}

impl AgentEnvironment {
    pub fn new(config: GameConfig, high_score: u32, rewards: RewardConfig) -> Result<Self, ConfigError> {
        let mut seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let engine = SimulationEngine::with_rng(
            config.clone(),
            high_score,
            StdRng::seed_from_u64(seeder.gen()),
        )?;
        Ok(Self {
            config,
            rewards,
            seeder,
            engine,
        })
    }

    /// Start a new episode and return its first snapshot
    ///
    /// The engine only restarts after game over, so an unfinished episode
    /// is dropped together with its engine; the high score carries over.
    pub fn reset(&mut self) -> Result<Snapshot, EngineError> {
        if matches!(
            self.engine.state(),
            Some(GameState::Playing) | Some(GameState::Paused)
        ) {
            let rng = StdRng::seed_from_u64(self.seeder.gen());
            self.engine = SimulationEngine::with_rng(self.config.clone(), self.engine.high_score(), rng)?;
        }
        self.engine.reset()?;
        self.engine.snapshot()
    }

    /// Advance one tick
    ///
    /// Returns (tick result, reward, done).
    pub fn step(&mut self, action: Option<Direction>) -> Result<(TickResult, f32, bool), EngineError> {
        let result = self.engine.tick(action)?;
        let reward = self.rewards.reward_for(&result);
        let done = self.engine.state() == Some(GameState::GameOver);
        Ok((result, reward, done))
    }

    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }
}
