//! Rejection sampling for food placement
//!
//! Draw a random cell, throw it away if it breaks a spacing rule, retry up to
//! a budget. Exhausting the budget is a normal outcome: the slot stays empty.

use rand::Rng;

use super::food::FoodSet;
use super::grid::{Bounds, GridCell};
use super::obstacles::ObstacleField;
use super::snake::SnakeBody;
use crate::config::SpawnRules;

/// Draw cells until one satisfies `accept` or the budget runs out
pub fn rejection_sample<R, F>(
    rng: &mut R,
    attempts: u32,
    mut draw: impl FnMut(&mut R) -> GridCell,
    mut accept: F,
) -> Option<GridCell>
where
    R: Rng + ?Sized,
    F: FnMut(GridCell) -> bool,
{
    (0..attempts).map(|_| draw(rng)).find(|&cell| accept(cell))
}

/// Read-only view of everything food has to keep clear of
pub struct SpawnContext<'a> {
    pub bounds: Bounds,
    pub start: GridCell,
    pub obstacles: &'a ObstacleField,
    pub snake: &'a SnakeBody,
    pub rules: &'a SpawnRules,
}

impl SpawnContext<'_> {
    /// All four spacing rules for a candidate against the current food
    pub fn is_valid_food_cell(&self, cell: GridCell, food: &FoodSet) -> bool {
        self.bounds.contains(cell)
            && !self.obstacles.contains(cell)
            && !self.obstacles.any_within(cell, self.rules.min_from_obstacles)
            && !self.snake.any_within(cell, self.rules.min_from_snake)
            && !food.any_within(cell, self.rules.min_from_food)
            && cell.distance(self.start) >= self.rules.min_from_start
    }

    /// Try to place one food item. Returns the cell if one was placed.
    pub fn place_food<R: Rng + ?Sized>(
        &self,
        food: &mut FoodSet,
        rng: &mut R,
        attempts: u32,
    ) -> Option<GridCell> {
        let bounds = self.bounds;
        let cell = rejection_sample(
            rng,
            attempts,
            |rng| bounds.random_cell(rng),
            |cell| self.is_valid_food_cell(cell, food),
        )?;
        food.insert(cell);
        Some(cell)
    }

    /// Fill empty slots up to capacity. Returns how many were placed.
    pub fn fill<R: Rng + ?Sized>(&self, food: &mut FoodSet, rng: &mut R, attempts: u32) -> usize {
        let missing = food.capacity().saturating_sub(food.len());
        let mut placed = 0;
        for _ in 0..missing {
            if self.place_food(&mut *food, &mut *rng, attempts).is_some() {
                placed += 1;
            }
        }
        if placed < missing {
            log::debug!(
                "Food spawn budget exhausted: placed {}/{} ({} on map)",
                placed,
                missing,
                food.len()
            );
        }
        placed
    }
}
