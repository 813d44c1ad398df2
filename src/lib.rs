//! Grid Snake - a grid-based Snake simulation engine
//!
//! This library provides:
//! - Core simulation (game module): grid, snake, placement, the engine state machine
//! - Control sources (control module): keyboard buffer and policy-driven agents
//! - Automated players and an episodic environment (agent module)
//! - High-score persistence (score module)
//! - TUI rendering and input (render, input modules)
//! - Execution modes (manual, agent play, headless training)

pub mod agent;
pub mod control;
pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod score;
