//! Continuous vehicle dynamics
//!
//! The vehicle is the only thing in the world that moves continuously. It is
//! integrated every frame; the discrete step only ever reads its position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::VehicleConfig;
use crate::{heading, normalize_angle};

/// What the world needs from a vehicle. Variants implement this directly and
/// are picked by the world's type parameter.
pub trait Vehicle {
    /// Build a fresh vehicle at the episode start position
    fn spawn(start: Vec2, config: &VehicleConfig) -> Self
    where
        Self: Sized;

    /// Smooth speed toward `power` (0-1) of the current max speed
    fn accelerate(&mut self, power: f32);
    /// Steer by `direction` (-1 to 1), scaled by speed-dependent authority
    fn turn(&mut self, direction: f32);
    /// Select a gear. Out-of-range gears are ignored.
    fn shift_gear(&mut self, gear: i32);
    /// Permanently raise max speed
    fn increase_speed(&mut self, amount: f32);
    /// Apply drag and advance position by `dt` seconds
    fn update(&mut self, dt: f32);

    fn position(&self) -> Vec2;
    fn speed(&self) -> f32;
    fn gear(&self) -> usize;
    fn rotation(&self) -> f32;
    fn max_speed(&self) -> f32;
    fn speed_bonus(&self) -> f32;
}

/// Geared car with exponential throttle/drag smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    position: Vec2,
    speed: f32,
    gear: usize,
    rotation: f32,
    /// Permanent bonus added on top of the gear cap
    speed_bonus: f32,
    max_speed: f32,
    tuning: VehicleConfig,
}

impl Car {
    pub fn new(position: Vec2, tuning: VehicleConfig) -> Self {
        // Out-of-range start gears fall back to neutral; config validation rejects them anyway
        let gear = if tuning.start_gear < tuning.gear_max_speeds.len() {
            tuning.start_gear
        } else {
            0
        };
        let mut car = Self {
            position,
            speed: 0.0,
            gear,
            rotation: 0.0,
            speed_bonus: 0.0,
            max_speed: 0.0,
            tuning,
        };
        car.recompute_max_speed();
        car
    }

    fn gear_cap(&self) -> f32 {
        self.tuning.gear_max_speeds.get(self.gear).copied().unwrap_or(0.0)
    }

    fn recompute_max_speed(&mut self) {
        self.max_speed = self.gear_cap() + self.speed_bonus;
    }

    /// Steering authority: grows with speed, bounded both ways
    fn steering_authority(&self) -> f32 {
        (self.speed * self.tuning.steering_speed_scale).clamp(
            self.tuning.min_steering_authority,
            self.tuning.max_steering_authority,
        )
    }

    pub fn tuning(&self) -> &VehicleConfig {
        &self.tuning
    }

    pub fn num_gears(&self) -> usize {
        self.tuning.gear_max_speeds.len()
    }
}

impl Vehicle for Car {
    fn spawn(start: Vec2, config: &VehicleConfig) -> Self {
        Car::new(start, config.clone())
    }

    fn accelerate(&mut self, power: f32) {
        let power = if power.is_finite() { power.clamp(0.0, 1.0) } else { 0.0 };
        let target = self.max_speed * power;
        let blend = self.tuning.acceleration.clamp(0.0, 1.0);
        self.speed = (self.speed + (target - self.speed) * blend).max(0.0);
    }

    fn turn(&mut self, direction: f32) {
        if !direction.is_finite() {
            return;
        }
        self.rotation += direction * self.tuning.steering_rate * self.steering_authority();
        // Keep rotation small; heading is periodic so this is invisible
        if self.rotation.abs() > 64.0 * std::f32::consts::PI {
            self.rotation = normalize_angle(self.rotation);
        }
    }

    fn shift_gear(&mut self, gear: i32) {
        let Ok(gear) = usize::try_from(gear) else {
            return;
        };
        if gear >= self.num_gears() {
            return;
        }
        self.gear = gear;
        self.recompute_max_speed();
    }

    fn increase_speed(&mut self, amount: f32) {
        // Bonus only ever grows
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        self.speed_bonus += amount;
        self.recompute_max_speed();
    }

    fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let decay = (self.tuning.drag * dt).clamp(0.0, 1.0);
        self.speed = (self.speed * (1.0 - decay)).max(0.0);
        self.position += heading(self.rotation) * self.speed * dt;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn gear(&self) -> usize {
        self.gear
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn max_speed(&self) -> f32 {
        self.max_speed
    }

    fn speed_bonus(&self) -> f32 {
        self.speed_bonus
    }
}
