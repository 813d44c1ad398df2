use std::collections::VecDeque;

use super::ControlSource;
use crate::game::{Command, Snapshot};

/// Keyboard-fed control source
///
/// Key presses between ticks are buffered so that a quick "up, left" turns
/// on two consecutive ticks instead of the second press overwriting the first.
#[derive(Debug, Clone)]
pub struct ManualControl {
    queue: VecDeque<Command>,
    capacity: usize,
}

impl ManualControl {
    pub const DEFAULT_CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Queue a decoded key press; returns false when the buffer is full
    pub fn push(&mut self, command: Command) -> bool {
        // Repeating the last buffered command adds nothing
        if self.queue.back() == Some(&command) {
            return true;
        }
        if self.queue.len() >= self.capacity {
            return false;
        }
        self.queue.push_back(command);
        true
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Default for ManualControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSource for ManualControl {
    fn next_command(&mut self, _snapshot: &Snapshot) -> Option<Command> {
        self.queue.pop_front()
    }

    fn name(&self) -> &str {
        "manual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameState};

    fn snapshot() -> Snapshot {
        Snapshot {
            grid_width: 5,
            grid_height: 5,
            snake: vec![Cell::new(2, 2)],
            direction: Direction::Right,
            food: Cell::new(4, 4),
            obstacles: Vec::new(),
            score: 0,
            high_score: 0,
            ticks: 0,
            state: GameState::Playing,
            end_reason: None,
        }
    }

    #[test]
    fn test_commands_in_order() {
        let mut control = ManualControl::new();
        control.push(Command::Turn(Direction::Up));
        control.push(Command::Turn(Direction::Left));

        let snap = snapshot();
        assert_eq!(control.next_command(&snap), Some(Command::Turn(Direction::Up)));
        assert_eq!(control.next_command(&snap), Some(Command::Turn(Direction::Left)));
        assert_eq!(control.next_command(&snap), None);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut control = ManualControl::with_capacity(2);
        assert!(control.push(Command::Turn(Direction::Up)));
        assert!(control.push(Command::Turn(Direction::Left)));
        assert!(!control.push(Command::Turn(Direction::Down)));
        assert_eq!(control.pending(), 2);
    }

    #[test]
    fn test_repeated_command_collapses() {
        let mut control = ManualControl::new();
        control.push(Command::Turn(Direction::Up));
        control.push(Command::Turn(Direction::Up));
        assert_eq!(control.pending(), 1);

        control.clear();
        assert_eq!(control.pending(), 0);
    }
}
