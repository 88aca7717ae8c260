//! Episode state
//!
//! A `World` owns everything one episode needs, including its RNG. Reset
//! throws the whole thing away and builds a new one.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::collision::Crash;
use super::food::FoodSet;
use super::grid::GridCell;
use super::obstacles::ObstacleField;
use super::snake::SnakeBody;
use super::spawn::SpawnContext;
use super::vehicle::{Car, Vehicle};
use crate::config::{ConfigError, WorldConfig};

/// Current phase of the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended. Terminal until reset.
    GameOver { victory: bool },
}

impl GamePhase {
    pub const VICTORY: GamePhase = GamePhase::GameOver { victory: true };
    pub const DEFEAT: GamePhase = GamePhase::GameOver { victory: false };

    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_playing()
    }

    pub fn is_victory(&self) -> bool {
        matches!(self, GamePhase::GameOver { victory: true })
    }
}

/// Things that happened, for the render/audio layer to react to.
/// Kept for one frame; `frame` discards whatever was not drained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Reset { seed: u64 },
    GearShifted { gear: usize },
    FoodEaten { cell: GridCell, total: u32 },
    Crashed { cause: Crash, head: GridCell },
    Victory { food_eaten: u32 },
}

/// One episode: vehicle, trail, obstacles, food, and the clock gating them
#[derive(Debug, Clone)]
pub struct World<V: Vehicle = Car> {
    /// The player's vehicle
    pub vehicle: V,
    /// Trail cells, head first
    pub snake: SnakeBody,
    pub obstacles: ObstacleField,
    pub food: FoodSet,
    pub phase: GamePhase,
    pub food_eaten: u32,
    /// Discrete steps taken this episode
    pub steps: u64,
    pub(crate) clock: SimulationClock,
    pub(crate) config: WorldConfig,
    pub(crate) rng: Pcg32,
    seed: u64,
    events: Vec<GameEvent>,
}

impl<V: Vehicle> World<V> {
    /// Validate `config` and build the first episode
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::generate(config, seed))
    }

    /// Build an episode from a validated config
    fn generate(config: WorldConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = config.bounds();
        let start = config.start;

        let obstacles = ObstacleField::generate(&config.obstacles, bounds, start, &mut rng);
        let snake = SnakeBody::new(start);
        let mut food = FoodSet::new(config.max_food_count);
        let placed = SpawnContext {
            bounds,
            start,
            obstacles: &obstacles,
            snake: &snake,
            rules: &config.spawn,
        }
        .fill(&mut food, &mut rng, config.spawn.initial_attempts);

        log::info!(
            "Episode seed {}: {}x{} grid, {} obstacles, {}/{} food",
            seed,
            config.width,
            config.height,
            obstacles.len(),
            placed,
            config.max_food_count
        );

        Self {
            vehicle: V::spawn(start.to_world(config.cell_size), &config.vehicle),
            snake,
            obstacles,
            food,
            phase: GamePhase::Playing,
            food_eaten: 0,
            steps: 0,
            clock: SimulationClock::new(config.move_delay),
            config,
            rng,
            seed,
            events: vec![GameEvent::Reset { seed }],
        }
    }

    /// New episode, seeded from this episode's generator
    pub fn reset(&mut self) {
        let seed = self.rng.random::<u64>();
        self.reset_with_seed(seed);
    }

    /// New episode with an explicit seed
    pub fn reset_with_seed(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::generate(config, seed);
    }

    /// Swap in a new config and start over. The old episode is kept if the
    /// config is rejected.
    pub fn reset_with_config(&mut self, config: WorldConfig, seed: u64) -> Result<(), ConfigError> {
        config.validate()?;
        *self = Self::generate(config, seed);
        Ok(())
    }

    /// Top food back up to capacity using the refill budget
    pub(crate) fn refill_food(&mut self) -> usize {
        let placed = SpawnContext {
            bounds: self.config.bounds(),
            start: self.config.start,
            obstacles: &self.obstacles,
            snake: &self.snake,
            rules: &self.config.spawn,
        }
        .fill(&mut self.food, &mut self.rng, self.config.spawn.refill_attempts);
        log::debug!("Refilled {} food ({} on map)", placed, self.food.len());
        placed
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Sampled cell under the vehicle right now
    pub fn vehicle_cell(&self) -> GridCell {
        GridCell::from_world(self.vehicle.position(), self.config.cell_size)
    }

    /// Read-only copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        let position = self.vehicle.position();
        Snapshot {
            seed: self.seed,
            phase: self.phase,
            steps: self.steps,
            food_eaten: self.food_eaten,
            win_food_count: self.config.win_food_count,
            vehicle: VehicleSnapshot {
                position: (position.x, position.y),
                speed: self.vehicle.speed(),
                rotation: self.vehicle.rotation(),
                gear: self.vehicle.gear(),
                max_speed: self.vehicle.max_speed(),
            },
            snake: self.snake.to_vec(),
            obstacles: self.obstacles.sorted_cells(),
            food: self.food.iter().collect(),
        }
    }
}

/// Vehicle readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub position: (f32, f32),
    pub speed: f32,
    pub rotation: f32,
    pub gear: usize,
    pub max_speed: f32,
}

/// Serializable view of a world between steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub phase: GamePhase,
    pub steps: u64,
    pub food_eaten: u32,
    pub win_food_count: u32,
    pub vehicle: VehicleSnapshot,
    /// Head first
    pub snake: Vec<GridCell>,
    pub obstacles: Vec<GridCell>,
    pub food: Vec<GridCell>,
}
