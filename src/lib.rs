//! Road Rush - A pseudo-3D arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (car physics, track, spawning, collisions, progression)
//! - `game`: Frame orchestrator driving update + render at a fixed cadence
//! - `renderer`: Display list building and the WebGPU pipeline
//! - `input`: Logical driving controls merged from every input source
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `highscores`: Top-10 leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{RenderError, SimError, StorageError};
pub use game::{FrameOutput, Game};
pub use highscores::HighScores;
pub use input::Controls;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target simulation + render rate
    pub const TARGET_FPS: f64 = 60.0;
    /// Below this the FPS monitor complains
    pub const LOW_FPS_THRESHOLD: u32 = 30;
    /// One simulation tick per frame at the fixed cadence
    pub const TICKS_PER_SECOND: u32 = TARGET_FPS as u32;

    /// Car body (screen pixels)
    pub const CAR_WIDTH: f32 = 30.0;
    pub const CAR_HEIGHT: f32 = 50.0;
    /// Distance of the car's spawn point above the bottom edge
    pub const CAR_START_OFFSET_Y: f32 = 100.0;

    /// Speed gained per tick while accelerating
    pub const ACCELERATION: f32 = 0.2;
    /// Fraction of speed lost per tick while coasting
    pub const DECELERATION: f32 = 0.1;
    /// Heading change per tick at full speed (radians)
    pub const TURN_RATE: f32 = 0.05;
    /// Speed multiplier applied each tick while braking
    pub const BRAKE_FACTOR: f32 = 0.8;
    /// Below this magnitude a coasting engine is switched off
    pub const ENGINE_IDLE_SPEED: f32 = 0.1;

    /// Nitro meter
    pub const NITRO_MAX: f32 = 100.0;
    pub const NITRO_BOOST: f32 = 1.5;
    pub const NITRO_DRAIN: f32 = 2.0;
    pub const NITRO_RECHARGE: f32 = 0.5;

    /// Lives at run start
    pub const START_LIVES: u32 = 3;
    /// Score gained per level
    pub const LEVEL_TARGET: u64 = 1000;

    /// Concurrent entity ceilings
    pub const MAX_OBSTACLES: usize = 20;
    pub const MAX_COLLECTIBLES: usize = 10;
    /// Per-tick collectible spawn chance (obstacles use the level's rate)
    pub const COLLECTIBLE_SPAWN_CHANCE: f32 = 0.008;
    /// Off-screen margins for spawning and culling
    pub const OBSTACLE_MARGIN: f32 = 50.0;
    pub const COLLECTIBLE_MARGIN: f32 = 30.0;

    /// Effect penalties
    pub const CRASH_SPEED_FACTOR: f32 = 0.5;
    pub const SLICK_SPEED_FACTOR: f32 = 0.8;
    pub const SLICK_TURN_FACTOR: f32 = 0.5;

    /// Timed effects (2 s and 5 s)
    pub const SLICK_DURATION_TICKS: u32 = 2 * TICKS_PER_SECOND;
    pub const SHIELD_DURATION_TICKS: u32 = 5 * TICKS_PER_SECOND;

    /// Day/night phase advance per tick
    pub const DAY_NIGHT_STEP: f32 = 0.001;
    /// Background at full night
    pub const NIGHT_COLOR: [u8; 3] = [0x1a, 0x1a, 0x2e];
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert an sRGB byte triple to normalized floats with the given alpha
#[inline]
pub fn rgb_to_f32(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_timers_last_real_seconds() {
        use consts::*;
        assert_eq!(SLICK_DURATION_TICKS as f64 / TARGET_FPS, 2.0);
        assert_eq!(SHIELD_DURATION_TICKS as f64 / TARGET_FPS, 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
    }

    #[test]
    fn test_rgb_to_f32() {
        let c = rgb_to_f32([255, 0, 51], 0.5);
        assert_eq!(c, [1.0, 0.0, 0.2, 0.5]);
    }
}
