//! Random placement of obstacles and food by rejection sampling.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

use super::error::PlacementError;
use super::grid::{Cell, GridSpace};

fn random_cell<R: Rng + ?Sized>(grid: &GridSpace, rng: &mut R) -> Cell {
    let x = rng.gen_range(0..grid.width()) as i32;
    let y = rng.gen_range(0..grid.height()) as i32;
    Cell::new(x, y)
}

/// Generates the static obstacle set for an episode
#[derive(Debug, Clone, Copy)]
pub struct ObstaclePlacer {
    max_attempts: usize,
}

impl ObstaclePlacer {
    /// `max_attempts` is the sampling budget per requested obstacle
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draw `count` distinct cells, none of them in `forbidden`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        grid: &GridSpace,
        forbidden: &BTreeSet<Cell>,
        count: usize,
        rng: &mut R,
    ) -> Result<BTreeSet<Cell>, PlacementError> {
        let blocked = forbidden.iter().filter(|cell| grid.contains(**cell)).count();
        let available = grid.area() - blocked;
        if count > available {
            return Err(PlacementError::InsufficientSpace {
                requested: count,
                available,
            });
        }

        let budget = self.max_attempts.saturating_mul(count.max(1));
        let mut obstacles = BTreeSet::new();
        let mut attempts = 0;

        while obstacles.len() < count {
            if attempts == budget {
                return Err(PlacementError::Exhausted { attempts });
            }
            attempts += 1;

            let cell = random_cell(grid, rng);
            if !forbidden.contains(&cell) {
                obstacles.insert(cell);
            }
        }

        Ok(obstacles)
    }
}

/// Picks a free cell for the next food item
#[derive(Debug, Clone, Copy)]
pub struct FoodPlacer {
    max_attempts: usize,
}

impl FoodPlacer {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draw a uniformly random cell for which `is_occupied` is false
    ///
    /// Rejection sampling runs for `max_attempts` draws; on a crowded grid
    /// the free cells are then enumerated and one is chosen uniformly.
    pub fn place<R, F>(&self, grid: &GridSpace, rng: &mut R, is_occupied: F) -> Result<Cell, PlacementError>
    where
        R: Rng + ?Sized,
        F: Fn(Cell) -> bool,
    {
        for _ in 0..self.max_attempts {
            let cell = random_cell(grid, rng);
            if !is_occupied(cell) {
                return Ok(cell);
            }
        }

        debug!(
            attempts = self.max_attempts,
            "food sampling exhausted, scanning free cells"
        );
        let free: Vec<Cell> = grid.cells().filter(|&cell| !is_occupied(cell)).collect();
        free.choose(rng).copied().ok_or(PlacementError::NoFreeCell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_obstacles_exact_count_and_disjoint() {
        let grid = GridSpace::new(10, 10);
        let forbidden: BTreeSet<Cell> = [Cell::new(5, 5), Cell::new(6, 5)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(7);

        let obstacles = ObstaclePlacer::new(100)
            .generate(&grid, &forbidden, 10, &mut rng)
            .unwrap();

        assert_eq!(obstacles.len(), 10);
        assert!(obstacles.iter().all(|cell| grid.contains(*cell)));
        assert!(obstacles.is_disjoint(&forbidden));
    }

    #[test]
    fn test_obstacles_zero_count() {
        let grid = GridSpace::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let obstacles = ObstaclePlacer::new(10)
            .generate(&grid, &BTreeSet::new(), 0, &mut rng)
            .unwrap();
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_obstacles_fill_remaining_space() {
        let grid = GridSpace::new(3, 3);
        let forbidden: BTreeSet<Cell> = [Cell::new(1, 1)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(3);

        let obstacles = ObstaclePlacer::new(1000)
            .generate(&grid, &forbidden, 8, &mut rng)
            .unwrap();
        assert_eq!(obstacles.len(), 8);
        assert!(!obstacles.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn test_obstacles_insufficient_space() {
        let grid = GridSpace::new(2, 2);
        let forbidden: BTreeSet<Cell> = [Cell::new(0, 0), Cell::new(9, 9)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(3);

        let err = ObstaclePlacer::new(10)
            .generate(&grid, &forbidden, 4, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            PlacementError::InsufficientSpace {
                requested: 4,
                available: 3
            }
        );
    }

    #[test]
    fn test_obstacles_budget_exhausted() {
        let grid = GridSpace::new(50, 50);
        let mut rng = StdRng::seed_from_u64(11);

        // Covering all 2500 cells in 2500 uniform draws never happens in practice
        let err = ObstaclePlacer::new(1)
            .generate(&grid, &BTreeSet::new(), 2500, &mut rng)
            .unwrap_err();
        assert!(matches!(err, PlacementError::Exhausted { attempts: 2500 }));
    }

    #[test]
    fn test_food_avoids_occupied() {
        let grid = GridSpace::new(5, 5);
        let occupied: BTreeSet<Cell> = grid.cells().filter(|c| c.x < 4).collect();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let food = FoodPlacer::new(64)
                .place(&grid, &mut rng, |cell| occupied.contains(&cell))
                .unwrap();
            assert_eq!(food.x, 4);
        }
    }

    #[test]
    fn test_food_fallback_finds_last_cell() {
        let grid = GridSpace::new(4, 4);
        let last = Cell::new(3, 2);
        let mut rng = StdRng::seed_from_u64(9);

        // A budget of one draw will usually miss; the scan must still find it.
        let food = FoodPlacer::new(1)
            .place(&grid, &mut rng, |cell| cell != last)
            .unwrap();
        assert_eq!(food, last);
    }

    #[test]
    fn test_food_no_free_cell() {
        let grid = GridSpace::new(2, 2);
        let mut rng = StdRng::seed_from_u64(2);
        let err = FoodPlacer::new(8).place(&grid, &mut rng, |_| true).unwrap_err();
        assert_eq!(err, PlacementError::NoFreeCell);
    }
}
