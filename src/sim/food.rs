//! Food on the map

use serde::{Deserialize, Serialize};

use super::grid::GridCell;

/// Capacity-bounded set of food cells. Small, so a vector keeps iteration
/// order stable for deterministic pickups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoodSet {
    cells: Vec<GridCell>,
    capacity: usize,
}

impl FoodSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cells.len() >= self.capacity
    }

    /// Below half capacity: time to top up
    pub fn needs_refill(&self) -> bool {
        self.cells.len() * 2 < self.capacity
    }

    /// Add a cell. Ignored when full or already present.
    pub fn insert(&mut self, cell: GridCell) -> bool {
        if self.is_full() || self.contains(cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }

    /// First food strictly closer than `distance` to `cell`
    pub fn find_within(&self, cell: GridCell, distance: f32) -> Option<GridCell> {
        self.cells.iter().copied().find(|f| f.distance(cell) < distance)
    }

    pub fn any_within(&self, cell: GridCell, distance: f32) -> bool {
        self.find_within(cell, distance).is_some()
    }

    pub fn remove(&mut self, cell: GridCell) -> bool {
        match self.cells.iter().position(|&f| f == cell) {
            Some(idx) => {
                self.cells.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells.iter().copied()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
