//! Grid Rally headless driver
//!
//! Runs one episode with a simple food-seeking autopilot standing in for the
//! input layer, logs events, and prints a summary.
//!
//! Usage: `grid-rally [config.json | casual | standard | hard] [seed] [--json]`

use grid_rally::consts::FRAME_DT;
use grid_rally::sim::{FrameInput, GameEvent, GridCell, Vehicle, World, frame};
use grid_rally::{ConfigError, Difficulty, WorldConfig, normalize_angle};

/// Simulated seconds before the driver gives up
const MAX_SECONDS: f32 = 180.0;

fn load_config(arg: Option<&str>) -> Result<WorldConfig, ConfigError> {
    match arg {
        None => Ok(WorldConfig::default()),
        Some(name) => match Difficulty::from_str(name) {
            Some(difficulty) => {
                log::info!("Difficulty: {}", difficulty.as_str());
                Ok(WorldConfig::from_difficulty(difficulty))
            }
            None => WorldConfig::load(name),
        },
    }
}

/// Steer toward the nearest food; coast when there is none
fn autopilot(world: &World) -> FrameInput {
    let pos = world.vehicle.position() / world.config().cell_size;
    let nearest = world.food.iter().min_by(|a, b| {
        let da = a.as_vec2().distance_squared(pos);
        let db = b.as_vec2().distance_squared(pos);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(target) = nearest else {
        return FrameInput::default();
    };

    let to_target = target.as_vec2() - pos;
    let desired = to_target.y.atan2(to_target.x);
    let error = normalize_angle(desired - world.vehicle.rotation());
    // Ease off while turning hard so the trail does not fold onto itself
    let throttle = if error.abs() > 1.0 { 0.4 } else { 1.0 };

    FrameInput {
        acceleration: throttle,
        steering: (error * 2.0).clamp(-1.0, 1.0),
        gear: Some(if to_target.length() > 20.0 { 2 } else { 1 }),
        reset: false,
    }
}

fn describe(cell: GridCell) -> String {
    format!("({}, {})", cell.x, cell.y)
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();
    log::info!("Grid Rally (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();

    let config = load_config(positional.first().copied())?;
    let seed = positional
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let mut world: World = World::new(config, seed)?;
    log::info!("Game initialized with seed: {}", seed);

    let max_frames = (MAX_SECONDS / FRAME_DT) as u32;
    let mut frames = 0;
    while world.phase.is_playing() && frames < max_frames {
        let input = autopilot(&world);
        frame(&mut world, &input, FRAME_DT);
        frames += 1;

        for event in world.drain_events() {
            match event {
                GameEvent::FoodEaten { cell, total } => {
                    log::info!("Food {} eaten at {}", total, describe(cell));
                }
                GameEvent::Crashed { cause, head } => {
                    log::warn!("Crashed ({}) at {}", cause.as_str(), describe(head));
                }
                GameEvent::Victory { food_eaten } => {
                    log::info!("Victory with {} food", food_eaten);
                }
                GameEvent::GearShifted { gear } => log::debug!("Gear {}", gear),
                GameEvent::Reset { seed } => log::debug!("Reset with seed {}", seed),
            }
        }
    }

    let outcome = if world.phase.is_victory() {
        "victory"
    } else if world.phase.is_terminal() {
        "game over"
    } else {
        "time limit"
    };
    println!(
        "{} after {:.1}s: {} steps, {}/{} food, length {}, max speed {:.1}",
        outcome,
        frames as f32 * FRAME_DT,
        world.steps,
        world.food_eaten,
        world.config().win_food_count,
        world.snake.len(),
        world.vehicle.max_speed()
    );

    if json {
        if let Ok(snapshot) = serde_json::to_string_pretty(&world.snapshot()) {
            println!("{}", snapshot);
        }
    }

    Ok(())
}
