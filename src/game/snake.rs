use std::collections::VecDeque;

use super::action::Direction;
use super::grid::Cell;

/// The snake in the game
///
/// Body segments are kept head-first in a `VecDeque` so that pushing a new
/// head and dropping the tail are both O(1). The body is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Create a single-cell snake
    pub fn new(head: Cell, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction,
        }
    }

    /// Create a snake from explicit segments, head first
    ///
    /// Returns `None` for an empty body.
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>, direction: Direction) -> Option<Self> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self { body, direction })
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail cell (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change heading for the next advance
    ///
    /// A reversal onto the current heading is silently rejected and
    /// `false` is returned.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Cell the head would enter on the next advance
    pub fn peek_next_head(&self) -> Cell {
        self.head().moved_in_direction(self.direction)
    }

    /// Move one step in the current direction, keeping the tail if `grow`
    pub fn advance(&mut self, grow: bool) {
        let new_head = self.peek_next_head();
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Whether any segment (head included) sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether moving the head into `cell` would hit the body
    ///
    /// With `tail_vacates` the last segment is ignored, since it moves out
    /// of the way on a non-growing step.
    pub fn collides_with_body(&self, cell: Cell, tail_vacates: bool) -> bool {
        let considered = if tail_vacates {
            self.body.len() - 1
        } else {
            self.body.len()
        };
        self.body.iter().take(considered).any(|&segment| segment == cell)
    }

    /// Segments head first
    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake has no segments
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
