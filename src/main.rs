use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use grid_snake::agent::{GreedyPolicy, Policy, RandomPolicy};
use grid_snake::game::{ControlMode, GameConfig};
use grid_snake::logging::{self, LogTarget};
use grid_snake::modes::{AgentPlayMode, HumanMode, TrainConfig, TrainMode};
use grid_snake::score::FileScoreStore;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Grid-based Snake with keyboard and agent control")]
struct Cli {
    /// Who controls the snake (defaults to the config file's mode, then manual)
    #[arg(long)]
    mode: Option<ControlMode>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Obstacles generated per episode
    #[arg(long)]
    obstacles: Option<usize>,

    /// Simulation ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game configuration; other flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the all-time high score
    #[arg(long, default_value = "highscore.txt")]
    high_score_file: PathBuf,

    /// Write logs to this file (terminal modes discard logs otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Episodes to run in agent-train mode
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Log a training summary every N episodes
    #[arg(long, default_value = "100")]
    log_frequency: usize,

    /// Policy used by the agent modes
    #[arg(long, default_value = "greedy")]
    policy: PolicyKind,

    /// In agent-play mode, wait for R after game over instead of restarting
    #[arg(long)]
    no_auto_reset: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Head for the food, avoiding immediately fatal moves
    Greedy,
    /// Random non-fatal moves
    Random,
}

impl Cli {
    /// Defaults, then the config file, then individual flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(obstacles) = self.obstacles {
            config.obstacle_count = obstacles;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_hz = tick_rate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn policy(&self, seed: Option<u64>) -> Box<dyn Policy> {
        match self.policy {
            PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;

    let headless = config.mode == ControlMode::AgentTrain;
    logging::init(LogTarget::for_mode(cli.log_file.as_deref(), headless))?;
    info!(
        mode = ?config.mode,
        width = config.grid_width,
        height = config.grid_height,
        obstacles = config.obstacle_count,
        seed = ?config.seed,
        "starting"
    );

    let store = Box::new(FileScoreStore::new(cli.high_score_file.clone()));

    // Dispatch to appropriate mode
    let mode = config.mode;
    match mode {
        ControlMode::Manual => {
            let mut human_mode = HumanMode::new(config, store)?;
            human_mode.run().await?;
        }
        ControlMode::AgentPlay => {
            let policy = cli.policy(config.seed);
            let mut play_mode = AgentPlayMode::new(config, policy, store, !cli.no_auto_reset)?;
            play_mode.run().await?;
        }
        ControlMode::AgentTrain => {
            let policy = cli.policy(config.seed);
            let mut train_config = TrainConfig::new(cli.episodes, config);
            train_config.log_frequency = cli.log_frequency;

            let mut train_mode = TrainMode::new(train_config, policy, store)?;
            let stats = train_mode.run()?;
            println!("{}", stats.format_summary());
        }
    }

    Ok(())
}
