//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: it is owned by the frame
//! orchestrator and handed by reference to each stage of the tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::car::{CAR_SKINS, Car, CarSkin};
use super::entity::{Collectible, Obstacle};
use super::level::Level;
use super::lighting::DayNight;
use super::track::Track;
use crate::consts::*;
use crate::error::SimError;

/// Render surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Orchestrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Car-skin picker is showing
    AwaitingSelection,
    Running,
    GameOver,
}

/// Cues emitted by the simulation for the audio layer. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EngineStart,
    EngineUpdate { frequency: f32, volume: f32 },
    EngineStop,
    Collision,
    PowerUp,
    LevelUp { level: u32 },
    MusicStart,
    MusicStop,
    GameOver { score: u64, level: u32 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub car: Car,
    pub track: Track,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub lighting: DayNight,
    pub score: u64,
    pub lives: u32,
    /// Elapsed Running ticks
    pub time_ticks: u64,
    /// 1-based level number (may run past the catalog)
    pub level: u32,
    /// Score when the last level-up happened
    pub level_progress: u64,
    /// Whether the engine cue is currently sounding
    pub engine_running: bool,
    /// Cues produced since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state waiting for a car to be picked
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let level = Level::get(1);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::AwaitingSelection,
            car: Car::new(viewport, CAR_SKINS[0], level.max_speed),
            track: Track::new(level.curve_intensity),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            lighting: DayNight::default(),
            score: 0,
            lives: START_LIVES,
            time_ticks: 0,
            level: 1,
            level_progress: 0,
            engine_running: false,
            events: Vec::new(),
        }
    }

    /// Reset every run value and enter Running with the chosen skin
    pub fn start_run(&mut self, skin: CarSkin, viewport: Viewport) {
        let level = Level::get(1);
        self.score = 0;
        self.lives = START_LIVES;
        self.time_ticks = 0;
        self.level = 1;
        self.level_progress = 0;
        self.car = Car::new(viewport, skin, level.max_speed);
        self.obstacles.clear();
        self.collectibles.clear();
        self.track = Track::new(level.curve_intensity);
        self.lighting = DayNight::default();
        self.engine_running = false;
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::MusicStart);
        log::info!("Run started with {} car (seed {})", skin.name, self.seed);
    }

    /// Current level parameters (clamped to the catalog)
    pub fn current_level(&self) -> &'static Level {
        Level::get(self.level)
    }

    /// End the run. Idempotent: only the first call per run has any effect.
    pub fn game_over(&mut self) {
        if self.phase != RunPhase::Running {
            return;
        }
        self.phase = RunPhase::GameOver;
        self.stop_engine();
        self.events.push(GameEvent::MusicStop);
        self.events.push(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
        log::info!("Game over: score {} at level {}", self.score, self.level);
    }

    /// Silence the engine cue if it is sounding
    pub fn stop_engine(&mut self) {
        if self.engine_running {
            self.engine_running = false;
            self.events.push(GameEvent::EngineStop);
        }
    }

    /// Drop transient entities after a fault
    pub fn clear_entities(&mut self) {
        self.obstacles.clear();
        self.collectibles.clear();
    }

    /// Hand queued cues to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reject states that would poison later ticks
    pub fn validate(&self) -> Result<(), SimError> {
        let car = &self.car;
        if !(car.pos.is_finite() && car.speed.is_finite() && car.angle.is_finite()) {
            return Err(SimError::NonFiniteCar {
                x: car.pos.x,
                y: car.pos.y,
                speed: car.speed,
            });
        }
        if let Some(index) = self.obstacles.iter().position(|o| !o.pos.is_finite()) {
            return Err(SimError::NonFiniteEntity {
                kind: "obstacle",
                index,
            });
        }
        if let Some(index) = self.collectibles.iter().position(|c| !c.pos.is_finite()) {
            return Err(SimError::NonFiniteEntity {
                kind: "collectible",
                index,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_new_state_awaits_selection() {
        let state = GameState::new(1, Viewport::default());
        assert_eq!(state.phase, RunPhase::AwaitingSelection);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert!(!state.track.is_empty());
    }

    #[test]
    fn test_start_run_resets_everything() {
        let view = Viewport::default();
        let mut state = GameState::new(1, view);
        state.score = 5000;
        state.lives = 1;
        state.level = 4;
        state.level_progress = 4000;
        state.car.speed = 9.0;
        state.lighting.phase = 0.7;

        state.start_run(CAR_SKINS[2], view);

        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.level_progress, 0);
        assert_eq!(state.car.speed, 0.0);
        assert_eq!(state.car.color, CAR_SKINS[2].color);
        assert_eq!(state.car.pos, Vec2::new(400.0, 500.0));
        assert_eq!(state.lighting.phase, 0.0);
        assert_eq!(state.drain_events(), vec![GameEvent::MusicStart]);
    }

    #[test]
    fn test_game_over_only_fires_once() {
        let view = Viewport::default();
        let mut state = GameState::new(1, view);
        state.start_run(CAR_SKINS[0], view);
        state.drain_events();

        state.game_over();
        state.game_over();

        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_validate_catches_nan() {
        let view = Viewport::default();
        let mut state = GameState::new(1, view);
        assert!(state.validate().is_ok());
        state.car.speed = f32::NAN;
        assert!(matches!(
            state.validate(),
            Err(SimError::NonFiniteCar { .. })
        ));
    }
}
