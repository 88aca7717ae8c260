//! Head checks for the discrete step
//!
//! All checks are point/threshold based on grid cells. Self-collision and
//! pickup compare Euclidean cell distances against configured thresholds
//! rather than testing exact cell equality.

use serde::{Deserialize, Serialize};

use super::food::FoodSet;
use super::grid::{Bounds, GridCell};
use super::obstacles::ObstacleField;
use super::snake::SnakeBody;
use crate::config::CollisionRules;

/// Why an episode ended badly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crash {
    /// Head sampled outside the grid
    OutOfBounds,
    /// Head landed on an obstacle
    Obstacle,
    /// Head came too close to its own trail
    SelfCollision,
}

impl Crash {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crash::OutOfBounds => "out of bounds",
            Crash::Obstacle => "obstacle",
            Crash::SelfCollision => "self collision",
        }
    }
}

/// Check a sampled head before it is committed to the body.
///
/// Order matters: bounds, then obstacles, then the trail. The current head
/// (the cell being left) is not part of the trail check.
pub fn check_head(
    head: GridCell,
    bounds: Bounds,
    obstacles: &ObstacleField,
    snake: &SnakeBody,
    rules: &CollisionRules,
) -> Option<Crash> {
    if !bounds.contains(head) {
        return Some(Crash::OutOfBounds);
    }
    if obstacles.contains(head) {
        return Some(Crash::Obstacle);
    }
    if snake.body_within(head, rules.self_collision_distance) {
        return Some(Crash::SelfCollision);
    }
    None
}

/// Food eaten by a head at `head`, if any
pub fn find_pickup(head: GridCell, food: &FoodSet, rules: &CollisionRules) -> Option<GridCell> {
    food.find_within(head, rules.pickup_distance)
}
