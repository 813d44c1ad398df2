//! Error types for the simulation core.
//!
//! None of these describe game conditions: hitting a wall or eating yourself
//! is a state transition. These are caller mistakes or impossible layouts.

use thiserror::Error;

/// Rejected game configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid {width}x{height} is too large for i32 coordinates")]
    GridTooLarge { width: usize, height: usize },
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("tick rate {hz} Hz is above the {max} Hz limit")]
    TickRateTooHigh { hz: u32, max: u32 },
    #[error("max_placement_attempts must be positive")]
    ZeroPlacementAttempts,
    #[error("{obstacles} obstacles do not fit on a {cells}-cell grid next to the snake and food")]
    TooManyObstacles { obstacles: usize, cells: usize },
}

/// Obstacle or food placement could not be satisfied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("requested {requested} cells but only {available} are free")]
    InsufficientSpace { requested: usize, available: usize },
    #[error("gave up after {attempts} sampling attempts")]
    Exhausted { attempts: usize },
    #[error("no free cell left on the grid")]
    NoFreeCell,
}

/// Misuse of the simulation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine has not been reset yet; call reset() before ticking")]
    NotStarted,
    #[error("reset is only allowed after game over")]
    EpisodeInProgress,
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PlacementError::InsufficientSpace {
            requested: 10,
            available: 3,
        };
        assert_eq!(err.to_string(), "requested 10 cells but only 3 are free");

        let err: EngineError = PlacementError::NoFreeCell.into();
        assert_eq!(err.to_string(), "no free cell left on the grid");
    }
}
