use crate::game::{Direction, Snapshot};

/// One step of experience handed to a policy's training hook
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Direction the policy asked for, `None` for "continue straight"
    pub action: Option<Direction>,
    pub reward: f32,
    pub ate_food: bool,
    /// Whether this step ended the episode
    pub done: bool,
}

/// Decision policy behind an automated control source
pub trait Policy {
    /// Choose a heading for the next tick, or `None` to continue straight
    fn select_action(&mut self, snapshot: &Snapshot) -> Option<Direction>;

    /// Learn from one transition; policies without learning ignore it
    fn train(&mut self, _transition: &Transition) {}

    /// Called when an episode finishes
    fn end_episode(&mut self, _score: u32) {}

    fn name(&self) -> &str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn select_action(&mut self, snapshot: &Snapshot) -> Option<Direction> {
        (**self).select_action(snapshot)
    }

    fn train(&mut self, transition: &Transition) {
        (**self).train(transition)
    }

    fn end_episode(&mut self, score: u32) {
        (**self).end_episode(score)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Directions that do not end the episode on the next tick
pub fn safe_directions(snapshot: &Snapshot) -> Vec<Direction> {
    let Some(head) = snapshot.head() else {
        return Vec::new();
    };
    Direction::ALL
        .into_iter()
        .filter(|dir| !dir.is_opposite(snapshot.direction))
        .filter(|&dir| !snapshot.is_fatal(head.moved_in_direction(dir)))
        .collect()
}
