use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::policy::{safe_directions, Policy};
use crate::game::{Direction, Snapshot};

/// Heads for the food, never taking a move that dies on the next tick
#[derive(Debug, Clone, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for GreedyPolicy {
    fn select_action(&mut self, snapshot: &Snapshot) -> Option<Direction> {
        let head = snapshot.head()?;
        safe_directions(snapshot).into_iter().min_by_key(|&dir| {
            let distance = head.moved_in_direction(dir).manhattan_distance(snapshot.food);
            // Prefer keeping the heading on ties
            (distance, dir != snapshot.direction)
        })
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

/// Uniformly random non-fatal moves
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn select_action(&mut self, snapshot: &Snapshot) -> Option<Direction> {
        safe_directions(snapshot).choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "random"
    }
}
