//! Grid Rally - a car that leaves a snake behind it
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle physics, grid world, game state)
//! - `config`: Data-driven world tuning and validation

pub mod config;
pub mod sim;

pub use config::{ConfigError, Difficulty, WorldConfig};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Grid extent (cells)
    pub const GRID_WIDTH: u32 = 120;
    pub const GRID_HEIGHT: u32 = 54;
    /// World units per grid cell
    pub const CELL_SIZE: f32 = 1.0;
    /// Start cell, left side of the map, vertically centered
    pub const START_X: i32 = 10;
    pub const START_Y: i32 = GRID_HEIGHT as i32 / 2;

    /// Seconds per discrete step
    pub const MOVE_DELAY: f32 = 0.1;
    /// Pickups needed for victory
    pub const WIN_FOOD_COUNT: u32 = 15;
    /// Food spawn cap
    pub const MAX_FOOD_COUNT: usize = 5;
    /// Permanent max-speed increase per pickup
    pub const BONUS_PER_FOOD: f32 = 1.0;

    /// Per-gear speed caps in cells/s. Gear 0 is neutral.
    pub const GEAR_MAX_SPEEDS: [f32; 4] = [0.0, 8.0, 16.0, 24.0];
    /// Blend factor toward target speed per accelerate call
    pub const ACCELERATION: f32 = 0.1;
    /// Drag rate (per second)
    pub const DRAG: f32 = 4.2;
    /// Rotation per turn call at full authority (radians)
    pub const STEERING_RATE: f32 = 0.03;
    /// Speed → steering authority scale, clamped to [MIN, MAX]
    pub const STEERING_SPEED_SCALE: f32 = 0.3;
    pub const MIN_STEERING_AUTHORITY: f32 = 0.1;
    pub const MAX_STEERING_AUTHORITY: f32 = 1.0;
    /// First non-neutral gear
    pub const START_GEAR: usize = 1;

    /// Head-to-segment distance that counts as hitting yourself
    pub const SELF_COLLISION_DISTANCE: f32 = 0.8;
    /// Head-to-food distance that counts as a pickup
    pub const PICKUP_DISTANCE: f32 = 2.0;

    /// Food rejection distances
    pub const FOOD_MIN_FROM_START: f32 = 5.0;
    pub const FOOD_MIN_FROM_SNAKE: f32 = 3.0;
    pub const FOOD_MIN_FROM_FOOD: f32 = 3.0;
    pub const FOOD_MIN_FROM_OBSTACLES: f32 = 1.0;
    /// Rejection-sampling budgets per food slot
    pub const INITIAL_SPAWN_ATTEMPTS: u32 = 100;
    pub const REFILL_SPAWN_ATTEMPTS: u32 = 50;

    /// Obstacle generation
    pub const OBSTACLE_COUNT: u32 = 50;
    pub const OBSTACLE_ATTEMPTS: u32 = 20;
    pub const OBSTACLE_MIN_FROM_START: f32 = 15.0;
    pub const OBSTACLE_EDGE_MARGIN_X: u32 = 20;
    pub const OBSTACLE_EDGE_MARGIN_Y: u32 = 5;
    pub const CLUSTER_PROBABILITY: f32 = 0.3;
    pub const CLUSTER_SIZE: u32 = 3;
    pub const CLUSTER_RADIUS: i32 = 2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    angle = angle.rem_euclid(2.0 * PI);
    if angle >= PI {
        angle -= 2.0 * PI;
    }
    angle
}

/// Unit direction for a rotation (0 = +x, counter-clockwise)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        // Either end of the range is fine for an odd multiple of π
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(5.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_heading_is_unit() {
        let h = heading(0.0);
        assert!((h.x - 1.0).abs() < 1e-6 && h.y.abs() < 1e-6);
        let h = heading(PI / 2.0);
        assert!(h.x.abs() < 1e-6 && (h.y - 1.0).abs() < 1e-6);
        assert!((heading(1.234).length() - 1.0).abs() < 1e-6);
    }
}
