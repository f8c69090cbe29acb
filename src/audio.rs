//! Audio system using Web Audio API
//!
//! Procedurally generated sounds, no external files needed. The engine and
//! the music are long-running oscillators; everything else is a one-shot.
//! Every Web Audio failure is swallowed: sound never affects the game.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::state::GameEvent;

/// A sustained tone we can retune and stop later
struct Voice {
    osc: OscillatorNode,
    gain: GainNode,
}

impl Voice {
    fn stop(self) {
        self.osc.stop().ok();
        self.gain.gain().set_value(0.0);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_gain: f32,
    music_gain: f32,
    engine: Option<Voice>,
    music: Option<Voice>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let defaults = Settings::default();
        Self {
            ctx,
            sfx_gain: defaults.sfx_gain(),
            music_gain: defaults.music_gain(),
            engine: None,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
        if self.music_gain <= 0.0 {
            self.stop_music();
        } else if let Some(music) = &self.music {
            music.gain.gain().set_value(MUSIC_LEVEL * self.music_gain);
        }
        if self.sfx_gain <= 0.0 {
            self.stop_engine();
        }
    }

    /// React to one simulation cue
    pub fn handle(&mut self, event: &GameEvent) {
        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match *event {
            GameEvent::EngineStart => self.start_engine(&ctx),
            GameEvent::EngineUpdate { frequency, volume } => {
                self.update_engine(&ctx, frequency, volume)
            }
            GameEvent::EngineStop => self.stop_engine(),
            GameEvent::Collision => self.play_collision(&ctx),
            GameEvent::PowerUp => self.play_powerup(&ctx),
            GameEvent::LevelUp { .. } => self.play_levelup(&ctx),
            GameEvent::MusicStart => self.start_music(&ctx),
            GameEvent::MusicStop => self.stop_music(),
            GameEvent::GameOver { .. } => {}
        }
    }

    /// Silence every sustained voice
    pub fn stop_all(&mut self) {
        self.stop_engine();
        self.stop_music();
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Engine - continuous sawtooth drone
    fn start_engine(&mut self, ctx: &AudioContext) {
        if self.engine.is_some() || self.sfx_gain <= 0.0 {
            return;
        }
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        gain.gain()
            .set_value_at_time(0.1 * self.sfx_gain, ctx.current_time())
            .ok();
        osc.start().ok();
        self.engine = Some(Voice { osc, gain });
    }

    fn update_engine(&mut self, ctx: &AudioContext, frequency: f32, volume: f32) {
        if self.engine.is_none() {
            self.start_engine(ctx);
        }
        let Some(engine) = &self.engine else { return };
        let t = ctx.current_time();
        engine.osc.frequency().set_value_at_time(frequency, t).ok();
        engine
            .gain
            .gain()
            .set_value_at_time(volume * self.sfx_gain, t)
            .ok();
    }

    fn stop_engine(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.stop();
        }
    }

    /// Collision - low crunch sweeping down
    fn play_collision(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.3 * self.sfx_gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.3)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Power-up - bright rising chirp
    fn play_powerup(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.2 * self.sfx_gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(800.0, t + 0.2)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Level up - up-and-back warble
    fn play_levelup(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.3 * self.sfx_gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.1)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.2)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Music - soft sine pad
    fn start_music(&mut self, ctx: &AudioContext) {
        if self.music.is_some() || self.music_gain <= 0.0 {
            return;
        }
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) else {
            return;
        };
        gain.gain()
            .set_value_at_time(MUSIC_LEVEL * self.music_gain, ctx.current_time())
            .ok();
        osc.start().ok();
        self.music = Some(Voice { osc, gain });
    }

    fn stop_music(&mut self) {
        if let Some(music) = self.music.take() {
            music.stop();
        }
    }
}

/// Base gain of the music pad before the player's volume
const MUSIC_LEVEL: f32 = 0.05;
