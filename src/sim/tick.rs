//! Frame update and discrete step
//!
//! Every frame integrates the vehicle. The clock decides when a frame also
//! runs a discrete step, which samples the vehicle into the grid and resolves
//! collisions, growth and food.

use serde::{Deserialize, Serialize};

use super::collision::{Crash, check_head, find_pickup};
use super::grid::GridCell;
use super::state::{GameEvent, GamePhase, World};
use super::vehicle::Vehicle;

/// Control inputs for one frame, already smoothed by the input layer
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Throttle, 0-1
    pub acceleration: f32,
    /// Steering, -1 (left) to 1 (right)
    pub steering: f32,
    /// Gear to select this frame, if any
    pub gear: Option<i32>,
    /// Tear down and start a new episode
    pub reset: bool,
}

/// What a discrete step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// World is terminal; nothing changed
    Frozen,
    /// Head advanced to `head`
    Moved { head: GridCell, ate: bool },
    Crashed(Crash),
    /// Final pickup landed
    Victory,
}

fn sanitize(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() { value.clamp(min, max) } else { 0.0 }
}

/// Advance one frame of `dt` seconds. Returns the discrete step outcome if the
/// clock fired this frame. Events left over from the previous frame are
/// dropped, so the consumer drains once per frame.
pub fn frame<V: Vehicle>(world: &mut World<V>, input: &FrameInput, dt: f32) -> Option<StepOutcome> {
    world.clear_events();

    // Frozen until reset. Reset requests while Playing are ignored.
    if world.phase.is_terminal() {
        if input.reset {
            world.reset();
        }
        return None;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    if let Some(gear) = input.gear {
        let before = world.vehicle.gear();
        world.vehicle.shift_gear(gear);
        let after = world.vehicle.gear();
        if after != before {
            log::debug!("Gear {} -> {}", before, after);
            world.push_event(GameEvent::GearShifted { gear: after });
        }
    }

    world.vehicle.turn(sanitize(input.steering, -1.0, 1.0));
    world.vehicle.accelerate(sanitize(input.acceleration, 0.0, 1.0));
    world.vehicle.update(dt);

    if world.clock.advance(dt) {
        Some(discrete_step(world))
    } else {
        None
    }
}

/// Run one discrete step regardless of the clock
pub fn discrete_step<V: Vehicle>(world: &mut World<V>) -> StepOutcome {
    if world.phase.is_terminal() {
        return StepOutcome::Frozen;
    }
    world.steps += 1;

    let head = world.vehicle_cell();
    let bounds = world.config.bounds();

    if let Some(cause) = check_head(
        head,
        bounds,
        &world.obstacles,
        &world.snake,
        &world.config.collision,
    ) {
        world.phase = GamePhase::DEFEAT;
        world.push_event(GameEvent::Crashed { cause, head });
        log::info!(
            "Game over: {} at ({}, {}) after {} steps, {} food, length {}",
            cause.as_str(),
            head.x,
            head.y,
            world.steps,
            world.food_eaten,
            world.snake.len()
        );
        return StepOutcome::Crashed(cause);
    }

    world.snake.push_head(head);

    let eaten = find_pickup(head, &world.food, &world.config.collision);
    if let Some(cell) = eaten {
        world.food.remove(cell);
        world.food_eaten += 1;
        world.vehicle.increase_speed(world.config.bonus_per_food);
        world.push_event(GameEvent::FoodEaten {
            cell,
            total: world.food_eaten,
        });
        log::debug!(
            "Ate food at ({}, {}): {}/{}, max speed {:.2}",
            cell.x,
            cell.y,
            world.food_eaten,
            world.config.win_food_count,
            world.vehicle.max_speed()
        );

        if world.food_eaten >= world.config.win_food_count {
            world.phase = GamePhase::VICTORY;
            world.push_event(GameEvent::Victory {
                food_eaten: world.food_eaten,
            });
            log::info!(
                "Victory after {} steps, length {}",
                world.steps,
                world.snake.len()
            );
            return StepOutcome::Victory;
        }
    } else {
        world.snake.trim_tail();
    }

    if world.food.needs_refill() {
        world.refill_food();
    }

    StepOutcome::Moved {
        head,
        ate: eaten.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObstacleConfig, SpawnRules, VehicleConfig, WorldConfig};
    use crate::consts::FRAME_DT;
    use crate::sim::obstacles::ObstacleField;
    use crate::sim::vehicle::Car;
    use glam::Vec2;

    /// Vehicle that sits wherever the test puts it
    #[derive(Debug, Clone)]
    struct Puppet {
        pos: Vec2,
        bonus: f32,
    }

    impl Puppet {
        fn place(&mut self, x: i32, y: i32) {
            self.pos = Vec2::new(x as f32, y as f32);
        }
    }

    impl Vehicle for Puppet {
        fn spawn(start: Vec2, _config: &VehicleConfig) -> Self {
            Self { pos: start, bonus: 0.0 }
        }
        fn accelerate(&mut self, _power: f32) {}
        fn turn(&mut self, _direction: f32) {}
        fn shift_gear(&mut self, _gear: i32) {}
        fn increase_speed(&mut self, amount: f32) {
            self.bonus += amount;
        }
        fn update(&mut self, _dt: f32) {}
        fn position(&self) -> Vec2 {
            self.pos
        }
        fn speed(&self) -> f32 {
            0.0
        }
        fn gear(&self) -> usize {
            1
        }
        fn rotation(&self) -> f32 {
            0.0
        }
        fn max_speed(&self) -> f32 {
            1.0 + self.bonus
        }
        fn speed_bonus(&self) -> f32 {
            self.bonus
        }
    }

    fn open_config() -> WorldConfig {
        WorldConfig {
            width: 20,
            height: 20,
            start: GridCell::new(2, 10),
            move_delay: 0.1,
            obstacles: ObstacleConfig::none(),
            // Scripted tests place their own food; refills would add noise
            spawn: SpawnRules {
                refill_attempts: 0,
                ..Default::default()
            },
            vehicle: VehicleConfig {
                gear_max_speeds: vec![0.0, 1.0, 2.0, 3.0],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// World with exactly the given food and nothing else
    fn puppet_world(config: WorldConfig, food: &[(i32, i32)]) -> World<Puppet> {
        let mut world = World::<Puppet>::new(config, 1).unwrap();
        world.food.clear();
        for &(x, y) in food {
            world.food.insert(GridCell::new(x, y));
        }
        world.drain_events();
        world
    }

    #[test]
    fn test_accelerating_car_stays_short_without_food() {
        let mut config = open_config();
        config.max_food_count = 1;
        config.spawn.min_from_start = 15.0;
        let mut world: World<Car> = World::new(config, 2).unwrap();

        let input = FrameInput {
            acceleration: 1.0,
            ..Default::default()
        };
        let mut steps = 0;
        for _ in 0..60 {
            if let Some(outcome) = frame(&mut world, &input, FRAME_DT) {
                assert!(matches!(outcome, StepOutcome::Moved { ate: false, .. }));
                steps += 1;
            }
        }
        assert!(steps >= 8);
        for _ in steps..10 {
            discrete_step(&mut world);
        }
        assert_eq!(world.snake.len(), 1);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.vehicle.position().x > 2.0);
        assert!(world.vehicle.speed() > 0.0);
    }

    #[test]
    fn test_food_on_next_head_is_eaten_and_body_grows() {
        let mut world = puppet_world(open_config(), &[(3, 10), (15, 15), (15, 3)]);
        world.vehicle.place(3, 10);

        let outcome = discrete_step(&mut world);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                head: GridCell::new(3, 10),
                ate: true
            }
        );
        assert_eq!(world.food_eaten, 1);
        assert!(!world.food.contains(GridCell::new(3, 10)));
        assert_eq!(world.snake.to_vec(), vec![GridCell::new(3, 10), GridCell::new(2, 10)]);
        assert_eq!(world.vehicle.speed_bonus(), world.config().bonus_per_food);
        assert!(world.drain_events().contains(&GameEvent::FoodEaten {
            cell: GridCell::new(3, 10),
            total: 1
        }));
    }

    #[test]
    fn test_tail_follows_when_not_eating() {
        let mut world = puppet_world(open_config(), &[(4, 10), (15, 15), (15, 3)]);
        world.vehicle.place(4, 10);
        discrete_step(&mut world);
        assert_eq!(world.snake.len(), 2);

        world.vehicle.place(5, 12);
        discrete_step(&mut world);
        assert_eq!(world.snake.to_vec(), vec![GridCell::new(5, 12), GridCell::new(4, 10)]);
    }

    #[test]
    fn test_out_of_bounds_ends_game() {
        let mut world = puppet_world(open_config(), &[]);
        world.vehicle.pos = Vec2::new(-0.6, 10.0);
        assert_eq!(discrete_step(&mut world), StepOutcome::Crashed(Crash::OutOfBounds));
        assert_eq!(world.phase, GamePhase::DEFEAT);

        let mut world = puppet_world(open_config(), &[]);
        world.vehicle.place(5, 20);
        assert_eq!(discrete_step(&mut world), StepOutcome::Crashed(Crash::OutOfBounds));
    }

    #[test]
    fn test_obstacle_ends_game() {
        let mut world = puppet_world(open_config(), &[]);
        world.obstacles = ObstacleField::from_cells([GridCell::new(6, 10)]);
        world.vehicle.place(6, 10);
        assert_eq!(discrete_step(&mut world), StepOutcome::Crashed(Crash::Obstacle));
        assert_eq!(world.snake.len(), 1);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut world = puppet_world(open_config(), &[(3, 10), (4, 10), (15, 15)]);
        world.vehicle.place(3, 10);
        discrete_step(&mut world);
        world.vehicle.place(5, 10);
        discrete_step(&mut world);
        assert_eq!(world.snake.len(), 3);
        assert_eq!(world.food_eaten, 2);

        // Back onto the trail
        world.vehicle.place(3, 10);
        assert_eq!(discrete_step(&mut world), StepOutcome::Crashed(Crash::SelfCollision));
        assert!(world.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::Crashed {
                cause: Crash::SelfCollision,
                ..
            }
        )));
    }

    #[test]
    fn test_victory_on_final_pickup_keeps_tail() {
        let mut config = open_config();
        config.win_food_count = 3;
        let mut world = puppet_world(config, &[(4, 10), (8, 10), (12, 10)]);

        world.vehicle.place(4, 10);
        discrete_step(&mut world);
        world.vehicle.place(8, 10);
        discrete_step(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);
        let food_before = world.food.len();

        world.vehicle.place(12, 10);
        assert_eq!(discrete_step(&mut world), StepOutcome::Victory);
        assert_eq!(world.phase, GamePhase::VICTORY);
        assert_eq!(world.food_eaten, 3);
        assert_eq!(world.snake.len(), 4);
        // No refill after the winning pickup
        assert_eq!(world.food.len(), food_before - 1);
    }

    #[test]
    fn test_terminal_world_is_frozen() {
        let mut world = puppet_world(open_config(), &[(10, 10)]);
        world.vehicle.place(25, 10);
        discrete_step(&mut world);
        assert!(world.phase.is_terminal());

        let snake = world.snake.clone();
        let food = world.food.clone();
        let steps = world.steps;
        world.vehicle.place(10, 10);
        for _ in 0..5 {
            assert_eq!(discrete_step(&mut world), StepOutcome::Frozen);
            assert_eq!(frame(&mut world, &FrameInput::default(), 1.0), None);
        }
        assert_eq!(world.snake, snake);
        assert_eq!(world.food, food);
        assert_eq!(world.steps, steps);
    }

    #[test]
    fn test_reset_input_restarts_terminal_world() {
        let mut world: World<Car> = World::new(open_config(), 3).unwrap();
        world.phase = GamePhase::DEFEAT;
        let reset = FrameInput {
            reset: true,
            ..Default::default()
        };
        assert_eq!(frame(&mut world, &reset, FRAME_DT), None);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.drain_events().iter().any(|e| matches!(e, GameEvent::Reset { .. })));
    }

    #[test]
    fn test_reset_input_ignored_while_playing() {
        let mut world: World<Car> = World::new(open_config(), 42).unwrap();
        let throttle = FrameInput {
            acceleration: 1.0,
            ..Default::default()
        };
        for _ in 0..30 {
            frame(&mut world, &throttle, FRAME_DT);
        }
        assert_eq!(world.phase, GamePhase::Playing);
        let steps = world.steps;
        let snake = world.snake.clone();

        let reset = FrameInput {
            reset: true,
            ..Default::default()
        };
        assert_eq!(frame(&mut world, &reset, 0.0), None);
        assert_eq!(world.seed(), 42);
        assert_eq!(world.steps, steps);
        assert_eq!(world.snake, snake);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_undrained_events_last_one_frame() {
        let mut world: World<Car> = World::new(open_config(), 6).unwrap();
        for gear in [3, 2, 1, 2] {
            let shift = FrameInput {
                gear: Some(gear),
                ..Default::default()
            };
            frame(&mut world, &shift, 0.0);
        }
        assert_eq!(world.drain_events(), vec![GameEvent::GearShifted { gear: 2 }]);
    }

    #[test]
    fn test_refill_when_below_half() {
        let mut config = open_config();
        config.max_food_count = 4;
        config.spawn.min_from_start = 0.0;
        config.spawn.min_from_food = 1.0;
        config.spawn.min_from_snake = 1.0;
        config.spawn.refill_attempts = 50;
        // One food left of four, eaten this step
        let mut world = puppet_world(config, &[(3, 10), (18, 18)]);
        world.vehicle.place(3, 10);
        discrete_step(&mut world);
        assert_eq!(world.food.len(), 4);
    }

    #[test]
    fn test_gear_input_is_applied_and_reported() {
        let mut world: World<Car> = World::new(open_config(), 4).unwrap();
        world.drain_events();
        let shift = FrameInput {
            gear: Some(3),
            ..Default::default()
        };
        frame(&mut world, &shift, FRAME_DT);
        assert_eq!(world.vehicle.gear(), 3);
        assert_eq!(world.drain_events(), vec![GameEvent::GearShifted { gear: 3 }]);

        let bad = FrameInput {
            gear: Some(9),
            ..Default::default()
        };
        frame(&mut world, &bad, FRAME_DT);
        assert_eq!(world.vehicle.gear(), 3);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_long_frame_runs_one_step() {
        let mut world = puppet_world(open_config(), &[]);
        let before = world.steps;
        assert!(frame(&mut world, &FrameInput::default(), 5.0).is_some());
        assert_eq!(world.steps, before + 1);
        assert_eq!(world.clock().accumulator(), 0.0);
    }

    #[test]
    fn test_malformed_input_is_ignored() {
        let mut world: World<Car> = World::new(open_config(), 5).unwrap();
        let input = FrameInput {
            acceleration: f32::NAN,
            steering: f32::INFINITY,
            ..Default::default()
        };
        frame(&mut world, &input, f32::NAN);
        assert_eq!(world.vehicle.speed(), 0.0);
        assert_eq!(world.vehicle.rotation(), 0.0);
        assert_eq!(world.phase, GamePhase::Playing);
    }
}
