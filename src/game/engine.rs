use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::{
    action::{Command, Direction},
    config::GameConfig,
    error::{ConfigError, EngineError, PlacementError},
    grid::{Cell, GridSpace},
    placement::{FoodPlacer, ObstaclePlacer},
    snake::Snake,
    state::{CollisionType, EndReason, GameState, Scenario, Snapshot},
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake moved this tick
    pub moved: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set on the tick that ended the episode
    pub end: Option<EndReason>,
    /// Final score, when it beat the high score known at episode start
    pub new_high_score: Option<u32>,
}

impl TickResult {
    fn idle() -> Self {
        Self::default()
    }

    pub fn terminated(&self) -> bool {
        self.end.is_some()
    }
}

/// Result of feeding one control input into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Ticked(TickResult),
    Paused,
    Resumed,
    Restarted,
    /// The command has no effect in the current state
    Ignored,
}

#[derive(Debug, Clone)]
struct Episode {
    snake: Snake,
    food: Cell,
    obstacles: BTreeSet<Cell>,
    score: u32,
    ticks: u32,
    state: GameState,
    end_reason: Option<EndReason>,
}

/// The game engine that owns the authoritative episode state
///
/// Mutating calls (`tick`, `toggle_pause`, `reset`) must be serialized by
/// the caller; `snapshot` copies out the last committed state.
pub struct SimulationEngine {
    config: GameConfig,
    grid: GridSpace,
    obstacle_placer: ObstaclePlacer,
    food_placer: FoodPlacer,
    rng: StdRng,
    high_score: u32,
    episode: Option<Episode>,
    episodes_started: u32,
}

impl SimulationEngine {
    /// Create an engine; the random source is seeded from `config.seed`
    /// when present
    pub fn new(config: GameConfig, high_score: u32) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, high_score, rng)
    }

    /// Create an engine around an injected random source
    pub fn with_rng(config: GameConfig, high_score: u32, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = GridSpace::new(config.grid_width, config.grid_height);

        Ok(Self {
            obstacle_placer: ObstaclePlacer::new(config.max_placement_attempts),
            food_placer: FoodPlacer::new(config.max_placement_attempts),
            config,
            grid,
            rng,
            high_score,
            episode: None,
            episodes_started: 0,
        })
    }

    /// Start a new episode
    ///
    /// Allowed before the first episode and after game over only.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.ensure_resettable()?;

        let snake = Snake::new(self.grid.center(), Direction::Right);
        let forbidden: BTreeSet<Cell> = snake.segments().collect();

        let obstacles = self.obstacle_placer.generate(
            &self.grid,
            &forbidden,
            self.config.obstacle_count,
            &mut self.rng,
        )?;
        let food = self.food_placer.place(&self.grid, &mut self.rng, |cell| {
            snake.occupies(cell) || obstacles.contains(&cell)
        })?;

        self.begin(Episode {
            snake,
            food,
            obstacles,
            score: 0,
            ticks: 0,
            state: GameState::Playing,
            end_reason: None,
        });
        Ok(())
    }

    /// Start a new episode from an explicit layout
    ///
    /// Same preconditions as `reset`. The layout must keep every cell on the
    /// grid, the body connected and free of repeats, and the food and
    /// obstacles off the body and off each other.
    pub fn load_scenario(&mut self, scenario: Scenario) -> Result<(), EngineError> {
        self.ensure_resettable()?;
        let invalid = |msg: String| -> Result<(), EngineError> { Err(EngineError::InvalidScenario(msg)) };

        if scenario.snake.is_empty() {
            return invalid("snake has no segments".to_string());
        }
        for &cell in scenario.snake.iter().chain(&scenario.obstacles) {
            if !self.grid.contains(cell) {
                return invalid(format!("cell ({}, {}) is off the grid", cell.x, cell.y));
            }
        }
        if !self.grid.contains(scenario.food) {
            return invalid("food is off the grid".to_string());
        }
        if let Some(pair) = scenario.snake.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
            return invalid(format!(
                "segments ({}, {}) and ({}, {}) are not adjacent",
                pair[0].x, pair[0].y, pair[1].x, pair[1].y
            ));
        }
        if let [head, neck, ..] = scenario.snake[..] {
            if head.moved_in_direction(scenario.direction) == neck {
                return invalid(format!("heading {:?} points back into the body", scenario.direction));
            }
        }

        let body: BTreeSet<Cell> = scenario.snake.iter().copied().collect();
        if body.len() != scenario.snake.len() {
            return invalid("snake overlaps itself".to_string());
        }
        let obstacles: BTreeSet<Cell> = scenario.obstacles.iter().copied().collect();
        if !obstacles.is_disjoint(&body) {
            return invalid("obstacle on the snake".to_string());
        }
        if body.contains(&scenario.food) || obstacles.contains(&scenario.food) {
            return invalid("food on an occupied cell".to_string());
        }

        let snake = Snake::from_segments(scenario.snake, scenario.direction)
            .ok_or_else(|| EngineError::InvalidScenario("snake has no segments".to_string()))?;

        self.begin(Episode {
            snake,
            food: scenario.food,
            obstacles,
            score: scenario.score,
            ticks: 0,
            state: GameState::Playing,
            end_reason: None,
        });
        Ok(())
    }

    fn ensure_resettable(&self) -> Result<(), EngineError> {
        match &self.episode {
            Some(episode) if episode.state != GameState::GameOver => {
                Err(EngineError::EpisodeInProgress)
            }
            _ => Ok(()),
        }
    }

    fn begin(&mut self, episode: Episode) {
        self.episodes_started += 1;
        debug!(
            episode = self.episodes_started,
            obstacles = episode.obstacles.len(),
            food_x = episode.food.x,
            food_y = episode.food.y,
            "episode started"
        );
        self.episode = Some(episode);
    }

    /// Advance the simulation by one tick
    ///
    /// `command` turns the snake before it moves. While paused or after game
    /// over nothing changes and an idle result is returned.
    pub fn tick(&mut self, command: Option<Direction>) -> Result<TickResult, EngineError> {
        let Self {
            grid,
            food_placer,
            rng,
            high_score,
            episode,
            ..
        } = self;
        let episode = episode.as_mut().ok_or(EngineError::NotStarted)?;

        if episode.state != GameState::Playing {
            return Ok(TickResult::idle());
        }

        if let Some(direction) = command {
            episode.snake.set_direction(direction);
        }

        let next_head = episode.snake.peek_next_head();
        let grows = next_head == episode.food;
        episode.ticks += 1;

        if let Some(collision) = check_collision(grid, episode, next_head, grows) {
            let new_high_score = finish(episode, EndReason::Collision(collision), high_score);
            return Ok(TickResult {
                moved: false,
                ate_food: false,
                end: episode.end_reason,
                new_high_score,
            });
        }

        episode.snake.advance(grows);
        if !grows {
            return Ok(TickResult {
                moved: true,
                ..TickResult::idle()
            });
        }

        episode.score += 1;
        let snake = &episode.snake;
        let obstacles = &episode.obstacles;
        let placed = food_placer.place(grid, rng, |cell| snake.occupies(cell) || obstacles.contains(&cell));
        match placed {
            Ok(food) => {
                episode.food = food;
                Ok(TickResult {
                    moved: true,
                    ate_food: true,
                    ..TickResult::idle()
                })
            }
            Err(PlacementError::NoFreeCell) => {
                let new_high_score = finish(episode, EndReason::BoardFilled, high_score);
                Ok(TickResult {
                    moved: true,
                    ate_food: true,
                    end: episode.end_reason,
                    new_high_score,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Flip between Playing and Paused
    ///
    /// Returns the new state, or `None` when there is nothing to toggle
    /// (no episode yet, or game over).
    pub fn toggle_pause(&mut self) -> Option<GameState> {
        let episode = self.episode.as_mut()?;
        episode.state = match episode.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::GameOver => return None,
        };
        debug!(state = ?episode.state, "pause toggled");
        Some(episode.state)
    }

    /// Feed one control input for this tick
    ///
    /// `None` continues straight. `Reset` outside game over is ignored here
    /// rather than rejected, since control sources may send it at any time.
    pub fn step(&mut self, command: Option<Command>) -> Result<StepOutcome, EngineError> {
        match command {
            None => self.tick(None).map(StepOutcome::Ticked),
            Some(Command::Turn(direction)) => self.tick(Some(direction)).map(StepOutcome::Ticked),
            Some(Command::TogglePause) => {
                if self.episode.is_none() {
                    return Err(EngineError::NotStarted);
                }
                Ok(match self.toggle_pause() {
                    Some(GameState::Paused) => StepOutcome::Paused,
                    Some(GameState::Playing) => StepOutcome::Resumed,
                    _ => StepOutcome::Ignored,
                })
            }
            Some(Command::Reset) => match self.state() {
                None | Some(GameState::GameOver) => {
                    self.reset()?;
                    Ok(StepOutcome::Restarted)
                }
                Some(_) => Ok(StepOutcome::Ignored),
            },
        }
    }

    /// Copy of the current episode for rendering and control sources
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let episode = self.episode.as_ref().ok_or(EngineError::NotStarted)?;
        Ok(Snapshot {
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            snake: episode.snake.segments().collect(),
            direction: episode.snake.direction(),
            food: episode.food,
            obstacles: episode.obstacles.iter().copied().collect(),
            score: episode.score,
            high_score: self.high_score,
            ticks: episode.ticks,
            state: episode.state,
            end_reason: episode.end_reason,
        })
    }

    pub fn state(&self) -> Option<GameState> {
        self.episode.as_ref().map(|episode| episode.state)
    }

    /// Score of the current episode, 0 before the first reset
    pub fn score(&self) -> u32 {
        self.episode.as_ref().map_or(0, |episode| episode.score)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn episodes_started(&self) -> u32 {
        self.episodes_started
    }

    pub fn grid(&self) -> &GridSpace {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Check if the candidate head position causes a collision
fn check_collision(grid: &GridSpace, episode: &Episode, next_head: Cell, grows: bool) -> Option<CollisionType> {
    if !grid.contains(next_head) {
        return Some(CollisionType::Wall);
    }

    // The tail steps out of the way unless the snake grows this tick
    if episode.snake.collides_with_body(next_head, !grows) {
        return Some(CollisionType::SelfCollision);
    }

    if episode.obstacles.contains(&next_head) {
        return Some(CollisionType::Obstacle);
    }

    None
}

/// Move the episode to GameOver and report a beaten high score
fn finish(episode: &mut Episode, reason: EndReason, high_score: &mut u32) -> Option<u32> {
    episode.state = GameState::GameOver;
    episode.end_reason = Some(reason);
    info!(
        score = episode.score,
        ticks = episode.ticks,
        length = episode.snake.len(),
        %reason,
        "game over"
    );

    if episode.score > *high_score {
        *high_score = episode.score;
        info!(high_score = episode.score, "new high score");
        Some(episode.score)
    } else {
        None
    }
}
