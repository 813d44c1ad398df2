//! Headless training loop for automated policies
//!
//! Runs episodes back to back through an `AgentEnvironment`, hands every
//! transition to the policy's training hook, and logs rolling statistics.
//!
//! # Example
//!
//! ```rust
//! use grid_snake::agent::GreedyPolicy;
//! use grid_snake::game::GameConfig;
//! use grid_snake::modes::{TrainConfig, TrainMode};
//! use grid_snake::score::MemoryScoreStore;
//!
//! let mut config = TrainConfig::new(5, GameConfig::small().with_seed(1));
//! config.log_frequency = 5;
//!
//! let mut train_mode =
//!     TrainMode::new(config, GreedyPolicy::new(), Box::new(MemoryScoreStore::new(0)))?;
//! let stats = train_mode.run()?;
//! assert_eq!(stats.total_episodes(), 5);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::agent::{AgentEnvironment, Policy, RewardConfig, Transition};
use crate::game::{EndReason, GameConfig};
use crate::metrics::TrainingStats;
use crate::score::{load_or_default, save_or_warn, ScoreStore};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to run
    pub num_episodes: usize,

    /// Episodes longer than this are cut off
    pub max_steps_per_episode: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Game configuration (grid size, obstacles, seed)
    pub game_config: GameConfig,

    /// Reward shaping
    pub rewards: RewardConfig,
}

impl TrainConfig {
    pub fn new(num_episodes: usize, game_config: GameConfig) -> Self {
        // Long enough to fill the board, short enough to stop a policy going in circles
        let max_steps_per_episode = game_config.cell_count().saturating_mul(4).max(100);
        Self {
            num_episodes,
            max_steps_per_episode,
            log_frequency: 100,
            game_config,
            rewards: RewardConfig::default(),
        }
    }
}

/// Summary of a single episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f32,
    pub steps: usize,
    pub score: u32,
    /// `None` when the episode hit the step limit
    pub end: Option<EndReason>,
}

/// Headless training mode
pub struct TrainMode<P: Policy> {
    policy: P,
    env: AgentEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
    store: Box<dyn ScoreStore>,
}

impl<P: Policy> TrainMode<P> {
    pub fn new(config: TrainConfig, policy: P, store: Box<dyn ScoreStore>) -> Result<Self> {
        let high_score = load_or_default(store.as_ref());
        let env = AgentEnvironment::new(config.game_config.clone(), high_score, config.rewards)
            .context("Invalid game configuration")?;

        Ok(Self {
            policy,
            env,
            // 100-episode rolling window
            stats: TrainingStats::new(100),
            config,
            store,
        })
    }

    /// Run every configured episode and return the final statistics
    pub fn run(&mut self) -> Result<&TrainingStats> {
        self.log_header();

        for episode in 0..self.config.num_episodes {
            let summary = self
                .run_episode()
                .with_context(|| format!("Episode {} failed", episode + 1))?;

            self.stats
                .record_episode(summary.reward, summary.steps, summary.score, summary.end);
            self.policy.end_episode(summary.score);

            debug!(
                episode = episode + 1,
                score = summary.score,
                steps = summary.steps,
                end = ?summary.end,
                "episode finished"
            );

            if (episode + 1) % self.config.log_frequency.max(1) == 0 {
                info!(
                    "[Episode {}/{}] {}",
                    episode + 1,
                    self.config.num_episodes,
                    self.stats.format_summary()
                );
            }
        }

        info!(
            high_score = self.env.engine().high_score(),
            "Training complete: {}",
            self.stats.format_summary()
        );
        Ok(&self.stats)
    }

    /// Run a single episode to game over or the step limit
    fn run_episode(&mut self) -> Result<EpisodeSummary> {
        let mut snapshot = self.env.reset()?;
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        loop {
            let action = self.policy.select_action(&snapshot);
            let (result, reward, done) = self.env.step(action)?;

            self.policy.train(&Transition {
                action,
                reward,
                ate_food: result.ate_food,
                done,
            });

            if let Some(score) = result.new_high_score {
                info!(score, "new high score");
                save_or_warn(self.store.as_mut(), score);
            }

            episode_reward += reward;
            episode_steps += 1;

            if done || episode_steps >= self.config.max_steps_per_episode {
                snapshot = self.env.snapshot()?;
                return Ok(EpisodeSummary {
                    reward: episode_reward,
                    steps: episode_steps,
                    score: snapshot.score,
                    end: snapshot.end_reason,
                });
            }

            snapshot = self.env.snapshot()?;
        }
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    fn log_header(&self) {
        let game = &self.config.game_config;
        info!(
            policy = self.policy.name(),
            episodes = self.config.num_episodes,
            grid = %format!("{}x{}", game.grid_width, game.grid_height),
            obstacles = game.obstacle_count,
            max_steps = self.config.max_steps_per_episode,
            log_frequency = self.config.log_frequency,
            "training started"
        );
    }
}
