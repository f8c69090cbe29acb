//! Score-driven level progression

use super::level::Level;
use super::state::{GameEvent, GameState};
use crate::consts::LEVEL_TARGET;

/// Progression stage of the tick. Returns true when a level-up happened.
///
/// Past the end of the catalog the level number keeps counting but nothing
/// else changes: the car and track stay on the last level's parameters.
pub fn check_level_up(state: &mut GameState) -> bool {
    if state.score < state.level_progress + LEVEL_TARGET {
        return false;
    }

    state.level_progress = state.score;
    state.level += 1;

    if Level::exists(state.level) {
        let level = Level::get(state.level);
        state.car.max_speed = level.max_speed;
        state.track.rebuild(level.curve_intensity);
        state.events.push(GameEvent::LevelUp { level: state.level });
        log::info!("Level up: {} ({})", state.level, level.name);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::car::CAR_SKINS;
    use crate::sim::level::LEVELS;
    use crate::sim::state::Viewport;

    fn running() -> GameState {
        let view = Viewport::default();
        let mut state = GameState::new(4, view);
        state.start_run(CAR_SKINS[0], view);
        state.drain_events();
        state
    }

    #[test]
    fn test_below_target_does_nothing() {
        let mut state = running();
        state.score = LEVEL_TARGET - 1;
        assert!(!check_level_up(&mut state));
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_reaching_target_advances_one_level() {
        let mut state = running();
        let before: Vec<f32> = state.track.segments.iter().map(|s| s.curve).collect();
        state.score = LEVEL_TARGET + 37;

        assert!(check_level_up(&mut state));

        assert_eq!(state.level, 2);
        assert_eq!(state.level_progress, LEVEL_TARGET + 37);
        assert_eq!(state.car.max_speed, LEVELS[1].max_speed);
        assert_eq!(state.track.curve_intensity, LEVELS[1].curve_intensity);
        let after: Vec<f32> = state.track.segments.iter().map(|s| s.curve).collect();
        assert_ne!(before, after);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelUp { level: 2 }]);

        // Needs another full target from the new baseline
        state.score += LEVEL_TARGET - 1;
        assert!(!check_level_up(&mut state));
        state.score += 1;
        assert!(check_level_up(&mut state));
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_past_catalog_keeps_last_parameters() {
        let mut state = running();
        state.level = LEVELS.len() as u32;
        state.car.max_speed = LEVELS[LEVELS.len() - 1].max_speed;
        state.score = LEVEL_TARGET;

        assert!(check_level_up(&mut state));

        assert_eq!(state.level, LEVELS.len() as u32 + 1);
        assert_eq!(state.car.max_speed, 16.0);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.current_level().name, "Master");
    }
}
