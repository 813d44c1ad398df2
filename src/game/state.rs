use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::Direction;
use super::grid::Cell;

/// Play state of the current episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit an obstacle
    Obstacle,
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision(CollisionType),
    /// Food was eaten and no free cell remained for the next one
    BoardFilled,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Collision(CollisionType::Wall) => write!(f, "hit a wall"),
            EndReason::Collision(CollisionType::SelfCollision) => write!(f, "bit itself"),
            EndReason::Collision(CollisionType::Obstacle) => write!(f, "hit an obstacle"),
            EndReason::BoardFilled => write!(f, "filled the board"),
        }
    }
}

/// Read-only view of the engine handed to renderers and control sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Snake body, head first
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Cell,
    /// Obstacles in ascending cell order
    pub obstacles: Vec<Cell>,
    pub score: u32,
    pub high_score: u32,
    pub ticks: u32,
    pub state: GameState,
    pub end_reason: Option<EndReason>,
}

impl Snapshot {
    /// `None` for a snapshot without segments
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.grid_width
            && (cell.y as usize) < self.grid_height
    }

    /// Whether moving the head into `cell` this tick ends the episode
    ///
    /// Mirrors the engine's collision rule, tail vacating included.
    pub fn is_fatal(&self, cell: Cell) -> bool {
        if !self.in_bounds(cell) || self.obstacles.binary_search(&cell).is_ok() {
            return true;
        }
        if cell == self.food {
            return self.snake.contains(&cell);
        }
        match self.snake.split_last() {
            Some((_tail, rest)) => rest.contains(&cell),
            None => false,
        }
    }
}

/// Explicit episode layout, for drills and reproducible tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Snake body, head first; consecutive cells must be adjacent
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Cell,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    /// Score the episode starts with
    #[serde(default)]
    pub score: u32,
}

impl Scenario {
    pub fn new(snake: Vec<Cell>, direction: Direction, food: Cell) -> Self {
        Self {
            snake,
            direction,
            food,
            obstacles: Vec::new(),
            score: 0,
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Cell>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            grid_width: 5,
            grid_height: 5,
            snake: vec![Cell::new(2, 2), Cell::new(1, 2), Cell::new(1, 3)],
            direction: Direction::Right,
            food: Cell::new(4, 4),
            obstacles: vec![Cell::new(3, 2)],
            score: 0,
            high_score: 0,
            ticks: 0,
            state: GameState::Playing,
            end_reason: None,
        }
    }

    #[test]
    fn test_is_fatal() {
        let snap = snapshot();
        assert!(snap.is_fatal(Cell::new(3, 2))); // obstacle
        assert!(snap.is_fatal(Cell::new(1, 2))); // body
        assert!(snap.is_fatal(Cell::new(-1, 0))); // wall
        assert!(!snap.is_fatal(Cell::new(1, 3))); // tail moves away
        assert!(!snap.is_fatal(Cell::new(2, 1)));
    }

    #[test]
    fn test_empty_snapshot_has_no_body() {
        let mut snap = snapshot();
        snap.snake.clear();
        assert_eq!(snap.head(), None);
        assert!(!snap.is_fatal(Cell::new(2, 2)));
        assert!(!snap.is_fatal(snap.food));
        assert!(snap.is_fatal(Cell::new(3, 2))); // obstacle still counts
    }

    #[test]
    fn test_end_reason_display() {
        assert_eq!(
            EndReason::Collision(CollisionType::Wall).to_string(),
            "hit a wall"
        );
        assert_eq!(EndReason::BoardFilled.to_string(), "filled the board");
    }

    #[test]
    fn test_scenario_json() {
        let json = r#"{"snake":[{"x":2,"y":2}],"direction":"Right","food":{"x":4,"y":2}}"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(
            scenario,
            Scenario::new(vec![Cell::new(2, 2)], Direction::Right, Cell::new(4, 2))
        );
    }
}
