//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven the same way by keyboard play and by automated agents.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod placement;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{ControlMode, GameConfig};
pub use engine::{SimulationEngine, StepOutcome, TickResult};
pub use error::{ConfigError, EngineError, PlacementError};
pub use grid::{Cell, GridSpace};
pub use placement::{FoodPlacer, ObstaclePlacer};
pub use snake::Snake;
pub use state::{CollisionType, EndReason, GameState, Scenario, Snapshot};
