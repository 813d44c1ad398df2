//! Statistics for headless agent runs
//!
//! Episode rewards, lengths and scores are averaged over a rolling window;
//! totals and end-reason counts cover the whole run.

use std::collections::VecDeque;

use crate::game::{CollisionType, EndReason};

/// Fixed-size window of recent values
#[derive(Debug, Clone)]
struct Rolling<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy + Into<f64>> Rolling<T> {
    fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// 0 for an empty window
    fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|&v| v.into()).sum();
        sum / self.values.len() as f64
    }
}

/// How many episodes ended each way
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndCounts {
    pub wall: usize,
    pub self_collision: usize,
    pub obstacle: usize,
    pub board_filled: usize,
    /// Cut off by the step limit
    pub truncated: usize,
}

impl EndCounts {
    fn count(&mut self, end: Option<EndReason>) {
        let slot = match end {
            Some(EndReason::Collision(CollisionType::Wall)) => &mut self.wall,
            Some(EndReason::Collision(CollisionType::SelfCollision)) => &mut self.self_collision,
            Some(EndReason::Collision(CollisionType::Obstacle)) => &mut self.obstacle,
            Some(EndReason::BoardFilled) => &mut self.board_filled,
            None => &mut self.truncated,
        };
        *slot += 1;
    }
}

/// Rolling and all-time statistics over finished episodes
///
/// # Example
///
/// ```rust
/// use grid_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(15.5, 150, 5, None);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.ends().truncated, 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    rewards: Rolling<f32>,
    lengths: Rolling<u32>,
    scores: Rolling<u32>,
    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    ends: EndCounts,
}

impl TrainingStats {
    /// `window` is the number of recent episodes the means cover (at least 1)
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            rewards: Rolling::new(window),
            lengths: Rolling::new(window),
            scores: Rolling::new(window),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            ends: EndCounts::default(),
        }
    }

    /// Record a finished episode; `end` is `None` when it was cut off
    pub fn record_episode(&mut self, reward: f32, steps: usize, score: u32, end: Option<EndReason>) {
        self.rewards.push(reward);
        self.lengths.push(u32::try_from(steps).unwrap_or(u32::MAX));
        self.scores.push(score);
        self.total_episodes += 1;
        self.total_steps += steps;
        self.best_score = self.best_score.max(score);
        self.ends.count(end);
    }

    pub fn mean_episode_reward(&self) -> f64 {
        self.rewards.mean()
    }

    pub fn mean_episode_length(&self) -> f64 {
        self.lengths.mean()
    }

    pub fn mean_episode_score(&self) -> f64 {
        self.scores.mean()
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn ends(&self) -> EndCounts {
        self.ends
    }

    pub fn window_size(&self) -> usize {
        self.rewards.capacity
    }

    /// One-line summary for progress logs
    pub fn format_summary(&self) -> String {
        let ends = &self.ends;
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Wall/Self/Obstacle/Full/Cut: {}/{}/{}/{}/{}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            ends.wall,
            ends.self_collision,
            ends.obstacle,
            ends.board_filled,
            ends.truncated,
        )
    }
}
