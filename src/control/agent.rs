use super::ControlSource;
use crate::agent::Policy;
use crate::game::{Command, GameState, Snapshot};

/// Control source driven by a decision policy
#[derive(Debug, Clone)]
pub struct AgentControl<P: Policy> {
    policy: P,
    auto_reset: bool,
}

impl<P: Policy> AgentControl<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            auto_reset: false,
        }
    }

    /// Issue `Reset` on game over so play continues unattended
    pub fn with_auto_reset(mut self, auto_reset: bool) -> Self {
        self.auto_reset = auto_reset;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

impl<P: Policy> ControlSource for AgentControl<P> {
    fn next_command(&mut self, snapshot: &Snapshot) -> Option<Command> {
        match snapshot.state {
            GameState::Playing => self.policy.select_action(snapshot).map(Command::Turn),
            GameState::Paused => None,
            GameState::GameOver if self.auto_reset => Some(Command::Reset),
            GameState::GameOver => None,
        }
    }

    fn name(&self) -> &str {
        self.policy.name()
    }
}
