//! Sources of per-tick commands
//!
//! The driving loop asks its `ControlSource` for at most one command per
//! tick and hands it to `SimulationEngine::step`. Keyboard play and agents
//! are interchangeable implementations.

pub mod agent;
pub mod manual;

pub use agent::AgentControl;
pub use manual::ManualControl;

use crate::game::{Command, Snapshot};

/// Supplies zero or one command per tick
pub trait ControlSource {
    /// `None` means "continue straight"
    fn next_command(&mut self, snapshot: &Snapshot) -> Option<Command>;

    fn name(&self) -> &str;
}
