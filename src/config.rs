//! World configuration and difficulty presets
//!
//! Everything the surrounding control layer can tune lives here. Configs are
//! plain serde structs so they can be loaded from JSON; every field has a
//! default, so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::GridCell;

/// Configuration problems. The only hard errors the simulation surfaces.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    ZeroSizeGrid { width: u32, height: u32 },
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("move delay must be positive and finite, got {0}")]
    InvalidMoveDelay(f32),
    #[error("gear table is empty")]
    EmptyGearTable,
    #[error("start gear {gear} is outside a gear table of {gears} entries")]
    StartGearOutOfRange { gear: usize, gears: usize },
    #[error("gear {gear} has invalid max speed {speed}")]
    InvalidGearSpeed { gear: usize, speed: f32 },
    #[error("start cell ({x}, {y}) is outside the grid")]
    StartOutOfBounds { x: i32, y: i32 },
    #[error("win food count must be at least 1")]
    ZeroWinCount,
    #[error("max food count must be at least 1")]
    ZeroFoodCapacity,
    #[error("cluster probability must be within [0, 1], got {0}")]
    InvalidProbability(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidValue { name: &'static str, value: f32 },
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Casual,
    #[default]
    Standard,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Standard => "Standard",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "standard" | "normal" => Some(Difficulty::Standard),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Primary obstacle count for this preset
    pub fn obstacle_count(&self) -> u32 {
        match self {
            Difficulty::Casual => OBSTACLE_COUNT / 2,
            Difficulty::Standard => OBSTACLE_COUNT,
            Difficulty::Hard => OBSTACLE_COUNT * 2,
        }
    }

    /// Chance each primary obstacle grows a cluster
    pub fn cluster_probability(&self) -> f32 {
        match self {
            Difficulty::Casual => 0.1,
            Difficulty::Standard => CLUSTER_PROBABILITY,
            Difficulty::Hard => 0.5,
        }
    }

    pub fn win_food_count(&self) -> u32 {
        match self {
            Difficulty::Casual => 10,
            Difficulty::Standard => WIN_FOOD_COUNT,
            Difficulty::Hard => 25,
        }
    }

    /// Faster stepping makes the trail harder to read
    pub fn move_delay(&self) -> f32 {
        match self {
            Difficulty::Casual => 0.12,
            Difficulty::Standard => MOVE_DELAY,
            Difficulty::Hard => 0.08,
        }
    }
}

/// Vehicle dynamics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Per-gear speed caps. Index 0 is neutral.
    pub gear_max_speeds: Vec<f32>,
    /// Blend factor toward target speed per accelerate call (0-1)
    pub acceleration: f32,
    /// Exponential drag rate per second
    pub drag: f32,
    /// Radians per turn call at full authority
    pub steering_rate: f32,
    /// Speed is scaled by this before clamping into authority range
    pub steering_speed_scale: f32,
    pub min_steering_authority: f32,
    pub max_steering_authority: f32,
    /// Gear selected on spawn
    pub start_gear: usize,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            gear_max_speeds: GEAR_MAX_SPEEDS.to_vec(),
            acceleration: ACCELERATION,
            drag: DRAG,
            steering_rate: STEERING_RATE,
            steering_speed_scale: STEERING_SPEED_SCALE,
            min_steering_authority: MIN_STEERING_AUTHORITY,
            max_steering_authority: MAX_STEERING_AUTHORITY,
            start_gear: START_GEAR,
        }
    }
}

/// Distance thresholds used by the discrete step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionRules {
    /// Head closer than this to a body segment is a crash
    pub self_collision_distance: f32,
    /// Head closer than this to food eats it
    pub pickup_distance: f32,
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self {
            self_collision_distance: SELF_COLLISION_DISTANCE,
            pickup_distance: PICKUP_DISTANCE,
        }
    }
}

/// Food placement constraints and budgets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRules {
    pub min_from_start: f32,
    pub min_from_snake: f32,
    pub min_from_food: f32,
    /// 1.0 or less only rejects cells that are obstacles themselves
    pub min_from_obstacles: f32,
    /// Attempts per slot when an episode starts
    pub initial_attempts: u32,
    /// Attempts per slot when topping up mid-episode
    pub refill_attempts: u32,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            min_from_start: FOOD_MIN_FROM_START,
            min_from_snake: FOOD_MIN_FROM_SNAKE,
            min_from_food: FOOD_MIN_FROM_FOOD,
            min_from_obstacles: FOOD_MIN_FROM_OBSTACLES,
            initial_attempts: INITIAL_SPAWN_ATTEMPTS,
            refill_attempts: REFILL_SPAWN_ATTEMPTS,
        }
    }
}

/// Obstacle field generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Primary obstacles to place
    pub count: u32,
    /// Rejection-sampling budget per primary obstacle
    pub attempts: u32,
    /// Primaries must be strictly farther than this from the start cell
    pub min_from_start: f32,
    /// Cells kept clear along the left/right edges (shrunk to fit small grids)
    pub edge_margin_x: u32,
    /// Cells kept clear along the top/bottom edges
    pub edge_margin_y: u32,
    /// Chance that a primary obstacle grows a cluster
    pub cluster_probability: f32,
    /// Max extra cells per cluster
    pub cluster_size: u32,
    /// Max offset of a cluster cell from its primary, per axis
    pub cluster_radius: i32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            count: OBSTACLE_COUNT,
            attempts: OBSTACLE_ATTEMPTS,
            min_from_start: OBSTACLE_MIN_FROM_START,
            edge_margin_x: OBSTACLE_EDGE_MARGIN_X,
            edge_margin_y: OBSTACLE_EDGE_MARGIN_Y,
            cluster_probability: CLUSTER_PROBABILITY,
            cluster_size: CLUSTER_SIZE,
            cluster_radius: CLUSTER_RADIUS,
        }
    }
}

impl ObstacleConfig {
    /// No obstacles at all
    pub fn none() -> Self {
        Self {
            count: 0,
            cluster_probability: 0.0,
            ..Default::default()
        }
    }
}

/// Complete episode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// World units per grid cell
    pub cell_size: f32,
    /// Where both the snake and the vehicle start
    pub start: GridCell,
    /// Seconds per discrete step
    pub move_delay: f32,
    pub win_food_count: u32,
    pub max_food_count: usize,
    /// Max-speed bonus granted per pickup
    pub bonus_per_food: f32,
    pub vehicle: VehicleConfig,
    pub collision: CollisionRules,
    pub spawn: SpawnRules,
    pub obstacles: ObstacleConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cell_size: CELL_SIZE,
            start: GridCell::new(START_X, START_Y),
            move_delay: MOVE_DELAY,
            win_food_count: WIN_FOOD_COUNT,
            max_food_count: MAX_FOOD_COUNT,
            bonus_per_food: BONUS_PER_FOOD,
            vehicle: VehicleConfig::default(),
            collision: CollisionRules::default(),
            spawn: SpawnRules::default(),
            obstacles: ObstacleConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Create config from a difficulty preset (applies preset defaults)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Apply a difficulty preset on top of the current values
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.obstacles.count = difficulty.obstacle_count();
        self.obstacles.cluster_probability = difficulty.cluster_probability();
        self.win_food_count = difficulty.win_food_count();
        self.move_delay = difficulty.move_delay();
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check everything an episode needs to be constructible
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSizeGrid {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(self.move_delay.is_finite() && self.move_delay > 0.0) {
            return Err(ConfigError::InvalidMoveDelay(self.move_delay));
        }
        if !self.bounds().contains(self.start) {
            return Err(ConfigError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
            });
        }
        if self.win_food_count == 0 {
            return Err(ConfigError::ZeroWinCount);
        }
        if self.max_food_count == 0 {
            return Err(ConfigError::ZeroFoodCapacity);
        }

        let vehicle = &self.vehicle;
        if vehicle.gear_max_speeds.is_empty() {
            return Err(ConfigError::EmptyGearTable);
        }
        if vehicle.start_gear >= vehicle.gear_max_speeds.len() {
            return Err(ConfigError::StartGearOutOfRange {
                gear: vehicle.start_gear,
                gears: vehicle.gear_max_speeds.len(),
            });
        }
        for (gear, &speed) in vehicle.gear_max_speeds.iter().enumerate() {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(ConfigError::InvalidGearSpeed { gear, speed });
            }
        }

        let p = self.obstacles.cluster_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability(p));
        }

        let non_negative = [
            ("bonus_per_food", self.bonus_per_food),
            ("vehicle.acceleration", vehicle.acceleration),
            ("vehicle.drag", vehicle.drag),
            ("vehicle.steering_rate", vehicle.steering_rate),
            ("vehicle.steering_speed_scale", vehicle.steering_speed_scale),
            ("vehicle.min_steering_authority", vehicle.min_steering_authority),
            ("vehicle.max_steering_authority", vehicle.max_steering_authority),
            ("collision.self_collision_distance", self.collision.self_collision_distance),
            ("collision.pickup_distance", self.collision.pickup_distance),
            ("spawn.min_from_start", self.spawn.min_from_start),
            ("spawn.min_from_snake", self.spawn.min_from_snake),
            ("spawn.min_from_food", self.spawn.min_from_food),
            ("spawn.min_from_obstacles", self.spawn.min_from_obstacles),
            ("obstacles.min_from_start", self.obstacles.min_from_start),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        if vehicle.min_steering_authority > vehicle.max_steering_authority {
            return Err(ConfigError::InvalidValue {
                name: "vehicle.min_steering_authority",
                value: vehicle.min_steering_authority,
            });
        }
        if self.obstacles.cluster_radius < 0 {
            return Err(ConfigError::InvalidValue {
                name: "obstacles.cluster_radius",
                value: self.obstacles.cluster_radius as f32,
            });
        }

        Ok(())
    }

    /// Grid extent as bounds
    pub fn bounds(&self) -> crate::sim::Bounds {
        crate::sim::Bounds::new(self.width, self.height)
    }
}
