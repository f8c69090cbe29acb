//! Frame orchestrator
//!
//! Owns the simulation state and drives one update + one render per eligible
//! host callback. Faults in either phase are contained here so the host loop
//! never stops rescheduling.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{LOW_FPS_THRESHOLD, TARGET_FPS};
use crate::highscores::HighScores;
use crate::input::Controls;
use crate::persistence::Storage;
use crate::renderer::scene::{Frame, SceneOptions, build_frame};
use crate::settings::Settings;
use crate::sim::car::CarSkin;
use crate::sim::state::{GameEvent, GameState, RunPhase, Viewport};
use crate::sim::tick::{TickInput, tick};

/// Consecutive render faults before the error frame replaces the world
pub const RENDER_FAULT_LIMIT: u32 = 3;

/// Slack for float error when callbacks land exactly one interval apart
const CLOCK_TOLERANCE_MS: f64 = 1e-6;

/// Throttles host callbacks down to the target cadence
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(target_fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / target_fps,
            last_ms: None,
        }
    }

    /// True (and the tick is consumed) once a full interval has elapsed
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last + CLOCK_TOLERANCE_MS < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Frames per wall-clock second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start_ms: Option<f64>,
    frames: u32,
    /// Rate measured over the last full second
    pub fps: u32,
}

impl FpsCounter {
    /// Count a frame. Returns the new rate whenever a second closes.
    pub fn frame(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        if now_ms - start < 1000.0 {
            return None;
        }

        self.fps = self.frames;
        self.frames = 0;
        self.window_start_ms = Some(now_ms);
        if self.fps < LOW_FPS_THRESHOLD {
            log::warn!("Low FPS detected: {}", self.fps);
        }
        Some(self.fps)
    }
}

/// What the host should do with this callback
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutput {
    /// Too early; nothing ran
    Throttled,
    /// Present this frame
    Frame(Frame),
    /// Rendering failed; keep showing whatever is on screen
    Dropped,
    /// Rendering keeps failing; present this and ask the player to restart
    Fault(Frame),
}

/// Values the host shows in its HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub speed: u32,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub level_name: &'static str,
    pub nitro: f32,
    pub fps: u32,
}

/// The game: simulation, bookkeeping and fault containment
pub struct Game {
    pub state: GameState,
    pub highscores: HighScores,
    pub settings: Settings,
    storage: Box<dyn Storage>,
    clock: FrameClock,
    fps: FpsCounter,
    render_faults: u32,
    /// Set when an update fault stopped the run
    halted: bool,
    /// Rank of the last finished run, if it made the board
    pub last_rank: Option<usize>,
    /// Cues waiting for the host
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64, storage: Box<dyn Storage>, viewport: Viewport) -> Self {
        let settings = Settings::load(storage.as_ref());
        let highscores = HighScores::load_or_default(storage.as_ref());
        let clock = FrameClock::new(TARGET_FPS);
        Self {
            state: GameState::new(seed, viewport),
            highscores,
            settings,
            storage,
            clock,
            fps: FpsCounter::default(),
            render_faults: 0,
            halted: false,
            last_rank: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Whether the last run was stopped by a contained update fault
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Start a run with the chosen car. Only valid while awaiting selection.
    pub fn start(&mut self, skin: CarSkin, viewport: Viewport) -> bool {
        if self.state.phase != RunPhase::AwaitingSelection {
            log::warn!("Ignoring start while {:?}", self.state.phase);
            return false;
        }

        // Fresh seed per run so consecutive runs differ
        self.state.seed = self.state.seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
        self.state.rng = Pcg32::seed_from_u64(self.state.seed);
        self.state.start_run(skin, viewport);
        self.events.extend(self.state.drain_events());
        self.halted = false;
        self.render_faults = 0;
        self.last_rank = None;

        self.settings.remember_skin(skin);
        if let Err(e) = self.settings.save(self.storage.as_ref()) {
            log::warn!("Could not save settings: {}", e);
        }
        true
    }

    /// Back to car selection after a run ended
    pub fn restart(&mut self) -> bool {
        if self.state.phase != RunPhase::GameOver {
            return false;
        }
        self.state.phase = RunPhase::AwaitingSelection;
        self.state.clear_entities();
        true
    }

    /// Apply and persist new preferences
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(self.storage.as_ref()) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    /// One host callback: maybe update, then render
    pub fn frame(&mut self, now_ms: f64, controls: Controls, viewport: Viewport) -> FrameOutput {
        if !self.clock.ready(now_ms) {
            return FrameOutput::Throttled;
        }
        self.fps.frame(now_ms);

        self.update(controls, viewport);
        self.render(viewport)
    }

    fn update(&mut self, controls: Controls, viewport: Viewport) {
        if self.state.phase == RunPhase::Running {
            let input = TickInput { controls, viewport };
            if let Err(e) = tick(&mut self.state, &input) {
                log::error!("Update fault, stopping the run: {}", e);
                self.halt();
            }
        }

        for event in self.state.drain_events() {
            if let GameEvent::GameOver { score, level } = event {
                self.record_score(score, level);
            }
            self.events.push(event);
        }
    }

    fn render(&mut self, viewport: Viewport) -> FrameOutput {
        if self.state.track.is_empty() {
            log::warn!("Track missing, rebuilding");
            let curve = self.state.current_level().curve_intensity;
            self.state.track.rebuild(curve);
        }

        let options = SceneOptions {
            show_minimap: self.settings.show_minimap,
        };
        match build_frame(&self.state, viewport, options) {
            Ok(frame) => {
                self.render_faults = 0;
                FrameOutput::Frame(frame)
            }
            Err(e) => {
                self.render_faults += 1;
                log::warn!("Render fault {}: {}", self.render_faults, e);
                self.state.clear_entities();
                if self.render_faults >= RENDER_FAULT_LIMIT {
                    FrameOutput::Fault(Frame::fault(viewport))
                } else {
                    FrameOutput::Dropped
                }
            }
        }
    }

    /// Leave Running without a score: entities cleared, cues silenced
    fn halt(&mut self) {
        self.state.clear_entities();
        self.state.stop_engine();
        self.state.events.push(GameEvent::MusicStop);
        self.state.phase = RunPhase::GameOver;
        self.halted = true;
    }

    fn record_score(&mut self, score: u64, level: u32) {
        let qualifies = self.highscores.qualifies(score);
        self.last_rank = self.highscores.add_record(score, level);
        if !qualifies {
            log::info!("Score {} did not make the board", score);
            return;
        }
        if let Err(e) = self.highscores.save(self.storage.as_ref()) {
            log::warn!("Could not save high scores: {}", e);
        }
    }

    /// Page is going away: silence everything and drop entities
    pub fn unload(&mut self) {
        self.state.stop_engine();
        self.state.clear_entities();
        self.events.extend(self.state.drain_events());
        self.events.push(GameEvent::MusicStop);
    }

    /// Hand queued cues to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> Hud {
        let state = &self.state;
        Hud {
            speed: (state.car.speed * 10.0).round().abs() as u32,
            score: state.score,
            lives: state.lives,
            level: state.level,
            level_name: state.current_level().name,
            nitro: state.car.nitro,
            fps: self.fps.fps,
        }
    }
}
