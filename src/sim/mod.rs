//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the episode
//! - Continuous vehicle integration every frame
//! - Discrete grid steps gated by a fixed-interval clock
//! - No rendering, input or platform dependencies

pub mod clock;
pub mod collision;
pub mod food;
pub mod grid;
pub mod obstacles;
pub mod snake;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use clock::SimulationClock;
pub use collision::{Crash, check_head, find_pickup};
pub use food::FoodSet;
pub use grid::{Bounds, GridCell};
pub use obstacles::ObstacleField;
pub use snake::SnakeBody;
pub use spawn::{SpawnContext, rejection_sample};
pub use state::{GameEvent, GamePhase, Snapshot, VehicleSnapshot, World};
pub use tick::{FrameInput, StepOutcome, discrete_step, frame};
pub use vehicle::{Car, Vehicle};
