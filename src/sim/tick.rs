//! Fixed timestep simulation tick
//!
//! One tick runs every stage in a fixed order against the shared state:
//! timed effects, car physics, spawner, collisions, progression, lighting,
//! distance scoring.

use super::car::update_car;
use super::collision::resolve_collisions;
use super::progression::check_level_up;
use super::spawn::update_entities;
use super::state::{GameState, RunPhase, Viewport};
use crate::error::SimError;
use crate::input::Controls;

/// Everything one tick reads from the outside world
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub controls: Controls,
    pub viewport: Viewport,
}

/// Advance the game state by one tick.
///
/// Does nothing unless a run is in progress. An error means the state went
/// non-finite during this tick; the caller decides how to recover.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if state.phase != RunPhase::Running {
        return Ok(());
    }

    state.car.tick_effects();
    update_car(state, &input.controls, input.viewport);
    update_entities(state, input.viewport);

    resolve_collisions(state);
    if state.phase != RunPhase::Running {
        return Ok(());
    }

    check_level_up(state);
    state.lighting.advance();

    state.score += state.car.speed.round().abs() as u64;
    state.time_ticks += 1;

    state.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::car::CAR_SKINS;
    use crate::sim::entity::ObstacleKind;
    use crate::sim::spawn::new_obstacle;
    use crate::sim::state::GameEvent;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Viewport::default());
        state.start_run(CAR_SKINS[1], Viewport::default());
        state.drain_events();
        state
    }

    fn throttle() -> TickInput {
        TickInput {
            controls: Controls {
                forward: true,
                ..Default::default()
            },
            viewport: Viewport::default(),
        }
    }

    #[test]
    fn test_tick_is_noop_outside_running() {
        let mut state = GameState::new(1, Viewport::default());
        tick(&mut state, &throttle()).unwrap();
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.car.speed, 0.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_tick_counts_time_and_distance() {
        let mut state = running(2);
        for _ in 0..20 {
            tick(&mut state, &throttle()).unwrap();
        }
        assert_eq!(state.time_ticks, 20);
        // Speed after n ticks is 0.2n, rounded per tick
        let expected: u64 = (1..=20).map(|n| (n as f32 * 0.2).round() as u64).sum();
        assert!(state.score >= expected);
        assert!((state.lighting.phase - 20.0 * DAY_NIGHT_STEP).abs() < 1e-5);
    }

    #[test]
    fn test_overlap_on_last_life_ends_the_run() {
        let mut state = running(3);
        state.lives = 1;
        let mut rng = Pcg32::seed_from_u64(0);
        let mut block = new_obstacle(ObstacleKind::Roadblock, state.car.pos.x, 1, &mut rng);
        block.pos = state.car.pos;
        state.obstacles.push(block);

        tick(&mut state, &TickInput::default()).unwrap();

        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.lives, 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 0, level: 1 }));
        assert!(events.contains(&GameEvent::MusicStop));

        // Nothing moves after the run ended
        let ticks = state.time_ticks;
        tick(&mut state, &throttle()).unwrap();
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_level_up_through_ticks() {
        let mut state = running(4);
        state.score = LEVEL_TARGET - 1;
        state.car.speed = 4.0;
        tick(&mut state, &throttle()).unwrap();
        // Progression runs before this tick's distance is added
        assert_eq!(state.level, 1);
        tick(&mut state, &throttle()).unwrap();
        assert_eq!(state.level, 2);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelUp { level: 2 })
        );
    }

    #[test]
    fn test_non_finite_state_is_reported() {
        let mut state = running(5);
        state.car.angle = f32::NAN;
        let result = tick(&mut state, &throttle());
        assert!(matches!(result, Err(SimError::NonFiniteCar { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99999);
        let mut b = running(99999);
        let inputs = [
            throttle(),
            TickInput {
                controls: Controls {
                    forward: true,
                    left: true,
                    boost: true,
                    ..Default::default()
                },
                viewport: Viewport::default(),
            },
            TickInput::default(),
        ];
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            let _ = tick(&mut a, input);
            let _ = tick(&mut b, input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.car, b.car);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.collectibles, b.collectibles);
        assert_eq!(a.events, b.events);
    }
}
