//! Automated players
//!
//! Provides:
//! - the `Policy` seam an automated control source decides through
//! - simple built-in policies (greedy, random)
//! - an episodic environment with reward shaping for training loops
//!
//! Learning internals are not part of this crate; `Policy::train` is the
//! hook a learning policy plugs into.

pub mod environment;
pub mod greedy;
pub mod policy;

pub use environment::{AgentEnvironment, RewardConfig};
pub use greedy::{GreedyPolicy, RandomPolicy};
pub use policy::{safe_directions, Policy, Transition};
