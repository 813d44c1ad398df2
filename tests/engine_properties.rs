//! Property-based tests for the simulation engine.
//!
//! Random seeds, grid sizes, and command sequences drive the engine through
//! whole episodes; every committed state is checked against the game rules.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashSet;

use grid_snake::game::{
    Cell, Command, Direction, GameConfig, GameState, SimulationEngine, Snapshot, StepOutcome,
};

fn direction() -> impl Strategy<Value = Option<Direction>> {
    prop_oneof![
        Just(None),
        Just(Some(Direction::Up)),
        Just(Some(Direction::Down)),
        Just(Some(Direction::Left)),
        Just(Some(Direction::Right)),
    ]
}

fn config(width: usize, height: usize, obstacles: usize, seed: u64) -> GameConfig {
    GameConfig::new(width, height)
        .with_obstacles(obstacles)
        .with_seed(seed)
}

fn started(config: GameConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config, 0).unwrap();
    engine.reset().unwrap();
    engine
}

fn in_bounds(snapshot: &Snapshot, cell: Cell) -> bool {
    cell.x >= 0
        && cell.y >= 0
        && (cell.x as usize) < snapshot.grid_width
        && (cell.y as usize) < snapshot.grid_height
}

fn check_layout(snapshot: &Snapshot) -> Result<(), TestCaseError> {
    for &cell in snapshot.snake.iter().chain(&snapshot.obstacles) {
        prop_assert!(in_bounds(snapshot, cell), "cell {:?} off the grid", cell);
    }
    prop_assert!(in_bounds(snapshot, snapshot.food));

    let body: HashSet<Cell> = snapshot.snake.iter().copied().collect();
    prop_assert_eq!(body.len(), snapshot.snake.len(), "snake overlaps itself");
    prop_assert!(
        snapshot.snake.windows(2).all(|w| w[0].is_adjacent(w[1])),
        "snake body is not connected: {:?}",
        snapshot.snake
    );

    if snapshot.state == GameState::Playing {
        prop_assert!(!body.contains(&snapshot.food), "food on the snake");
        prop_assert!(snapshot.obstacles.binary_search(&snapshot.food).is_err(), "food on an obstacle");
    }
    Ok(())
}

/// A fresh episode: obstacles clear of the starting body and all of them placed
fn check_fresh_episode(snapshot: &Snapshot, obstacles: usize) -> Result<(), TestCaseError> {
    check_layout(snapshot)?;
    let body: HashSet<Cell> = snapshot.snake.iter().copied().collect();
    prop_assert!(
        snapshot.obstacles.iter().all(|cell| !body.contains(cell)),
        "obstacle on the starting body"
    );
    prop_assert_eq!(snapshot.obstacles.len(), obstacles);
    prop_assert_eq!(snapshot.score, 0);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every cell stays on the grid and food never shares a cell while playing.
    #[test]
    fn prop_layout_invariants(
        width in 4usize..14,
        height in 4usize..14,
        obstacles in 0usize..8,
        seed in any::<u64>(),
        commands in prop::collection::vec(direction(), 1..300),
    ) {
        let mut engine = started(config(width, height, obstacles, seed));

        check_fresh_episode(&engine.snapshot().unwrap(), obstacles)?;

        for command in commands {
            engine.tick(command).unwrap();
            check_layout(&engine.snapshot().unwrap())?;

            if engine.state() == Some(GameState::GameOver) {
                engine.reset().unwrap();
                check_fresh_episode(&engine.snapshot().unwrap(), obstacles)?;
            }
        }
    }

    /// Eating grows the snake by one and scores one; any other tick keeps its length.
    #[test]
    fn prop_growth_law(
        seed in any::<u64>(),
        commands in prop::collection::vec(direction(), 1..300),
    ) {
        let mut engine = started(config(8, 8, 3, seed));

        for command in commands {
            let before = engine.snapshot().unwrap();
            let result = engine.tick(command).unwrap();
            let after = engine.snapshot().unwrap();

            if result.ate_food {
                prop_assert_eq!(after.snake.len(), before.snake.len() + 1);
                prop_assert_eq!(after.score, before.score + 1);
                prop_assert_eq!(after.head(), Some(before.food));
            } else {
                prop_assert_eq!(after.snake.len(), before.snake.len());
                prop_assert_eq!(after.score, before.score);
            }

            if engine.state() == Some(GameState::GameOver) {
                engine.reset().unwrap();
            }
        }
    }

    /// Asking for the opposite heading never changes the heading.
    #[test]
    fn prop_no_reverse(
        seed in any::<u64>(),
        commands in prop::collection::vec(direction(), 1..200),
    ) {
        let mut engine = started(config(10, 10, 0, seed));

        for command in commands {
            let before = engine.snapshot().unwrap();
            engine.tick(command).unwrap();
            let after = engine.snapshot().unwrap();

            if command == Some(before.direction.opposite()) {
                prop_assert_eq!(after.direction, before.direction);
            }

            if engine.state() == Some(GameState::GameOver) {
                engine.reset().unwrap();
            }
        }
    }

    /// Ticks while paused change nothing.
    #[test]
    fn prop_pause_idempotent(
        seed in any::<u64>(),
        warmup in prop::collection::vec(direction(), 0..20),
        paused in prop::collection::vec(direction(), 1..50),
    ) {
        let mut engine = started(config(12, 12, 4, seed));
        for command in warmup {
            engine.tick(command).unwrap();
            if engine.state() == Some(GameState::GameOver) {
                engine.reset().unwrap();
            }
        }

        prop_assert_eq!(engine.step(Some(Command::TogglePause)).unwrap(), StepOutcome::Paused);
        let before = engine.snapshot().unwrap();

        for command in paused {
            let result = engine.tick(command).unwrap();
            prop_assert!(!result.moved);
        }

        let after = engine.snapshot().unwrap();
        prop_assert_eq!(&after.snake, &before.snake);
        prop_assert_eq!(after.food, before.food);
        prop_assert_eq!(&after.obstacles, &before.obstacles);
        prop_assert_eq!(after.score, before.score);
        prop_assert_eq!(after.direction, before.direction);
        prop_assert_eq!(after.state, GameState::Paused);
    }

    /// The same seed and commands always end the same way.
    #[test]
    fn prop_terminal_determinism(
        seed in any::<u64>(),
        commands in prop::collection::vec(direction(), 1..400),
    ) {
        let mut first = started(config(9, 7, 5, seed));
        let mut second = started(config(9, 7, 5, seed));
        prop_assert_eq!(first.snapshot().unwrap(), second.snapshot().unwrap());

        for command in commands {
            let a = first.tick(command).unwrap();
            let b = second.tick(command).unwrap();
            prop_assert_eq!(a, b);
            if a.terminated() {
                break;
            }
        }

        let a = first.snapshot().unwrap();
        let b = second.snapshot().unwrap();
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.end_reason, b.end_reason);
        prop_assert_eq!(a, b);
    }
}
