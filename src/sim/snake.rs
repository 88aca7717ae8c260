//! The snake trail left behind by the vehicle

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::GridCell;

/// Ordered trail cells, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GridCell>", into = "Vec<GridCell>")]
pub struct SnakeBody {
    segments: VecDeque<GridCell>,
}

impl TryFrom<Vec<GridCell>> for SnakeBody {
    type Error = &'static str;

    fn try_from(cells: Vec<GridCell>) -> Result<Self, Self::Error> {
        if cells.is_empty() {
            return Err("snake needs at least one segment");
        }
        Ok(Self {
            segments: cells.into(),
        })
    }
}

impl From<SnakeBody> for Vec<GridCell> {
    fn from(snake: SnakeBody) -> Self {
        snake.segments.into()
    }
}

impl SnakeBody {
    /// Single-cell snake at `start`
    pub fn new(start: GridCell) -> Self {
        let mut segments = VecDeque::with_capacity(32);
        segments.push_back(start);
        Self { segments }
    }

    pub fn head(&self) -> GridCell {
        // Constructor guarantees one segment and trim_tail never removes the last
        self.segments[0]
    }

    pub fn tail(&self) -> GridCell {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for the usual `len`/`is_empty` pairing
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Head first
    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.segments.iter().copied()
    }

    /// Insert a new head
    pub fn push_head(&mut self, cell: GridCell) {
        self.segments.push_front(cell);
    }

    /// Drop the tail, unless it is the only segment left
    pub fn trim_tail(&mut self) -> Option<GridCell> {
        if self.segments.len() > 1 {
            self.segments.pop_back()
        } else {
            None
        }
    }

    /// True if any segment is strictly closer than `distance` to `cell`
    pub fn any_within(&self, cell: GridCell, distance: f32) -> bool {
        self.iter().any(|s| s.distance(cell) < distance)
    }

    /// Like `any_within`, skipping the current head
    pub fn body_within(&self, cell: GridCell, distance: f32) -> bool {
        self.iter().skip(1).any(|s| s.distance(cell) < distance)
    }

    pub fn to_vec(&self) -> Vec<GridCell> {
        self.iter().collect()
    }
}
