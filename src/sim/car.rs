//! Player car physics
//!
//! Arcade handling only: speed is a scalar along the heading, steering is
//! scaled by the current fraction of top speed, and the car is kept inside
//! the viewport by a rectangle clamp.

use glam::Vec2;

use super::state::{GameEvent, GameState, Viewport};
use super::track::TRAVEL_SCALE;
use crate::consts::*;
use crate::input::Controls;

/// A selectable paint job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarSkin {
    pub name: &'static str,
    pub color: [u8; 3],
}

pub const CAR_SKINS: [CarSkin; 6] = [
    CarSkin {
        name: "Red",
        color: [0xff, 0x44, 0x44],
    },
    CarSkin {
        name: "Blue",
        color: [0x44, 0xaa, 0xff],
    },
    CarSkin {
        name: "Green",
        color: [0x44, 0xff, 0x44],
    },
    CarSkin {
        name: "Orange",
        color: [0xff, 0xaa, 0x44],
    },
    CarSkin {
        name: "White",
        color: [0xff, 0xff, 0xff],
    },
    CarSkin {
        name: "Black",
        color: [0x22, 0x22, 0x22],
    },
];

impl CarSkin {
    /// Skin by index, falling back to the first one
    pub fn by_index(index: usize) -> CarSkin {
        CAR_SKINS.get(index).copied().unwrap_or(CAR_SKINS[0])
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    /// Center, in screen space
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Heading (radians, 0 = up the screen)
    pub angle: f32,
    pub speed: f32,
    /// Top speed for the current level
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Current steering rate (halved while on an oil slick)
    pub turn_rate: f32,
    pub nitro: f32,
    pub nitro_active: bool,
    pub shield: bool,
    /// Ticks until the shield drops
    pub shield_ticks: u32,
    /// Ticks until steering recovers from an oil slick
    pub slick_ticks: u32,
    pub color: [u8; 3],
}

impl Car {
    /// A parked car at the bottom-center of the viewport
    pub fn new(viewport: Viewport, skin: CarSkin, max_speed: f32) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width / 2.0,
                viewport.height - CAR_START_OFFSET_Y,
            ),
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            angle: 0.0,
            speed: 0.0,
            max_speed,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            turn_rate: TURN_RATE,
            nitro: NITRO_MAX,
            nitro_active: false,
            shield: false,
            shield_ticks: 0,
            slick_ticks: 0,
            color: skin.color,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Apply one tick of throttle, nitro, brake and steering.
    ///
    /// Returns true when the engine is under power (forward or reverse held).
    pub fn apply_controls(&mut self, controls: &Controls) -> bool {
        let boosting = controls.boost && controls.forward && self.nitro > 0.0;
        let cap = if boosting {
            self.max_speed * NITRO_BOOST
        } else {
            self.max_speed
        };

        let powered = if controls.forward {
            let throttle = (self.speed + self.acceleration).min(self.max_speed);
            self.speed = if boosting {
                // Nitro stacks a second step on the throttle, up to the raised cap
                (throttle.max(self.speed) + self.acceleration).min(cap)
            } else {
                throttle
            };
            true
        } else if controls.back {
            self.speed = (self.speed - self.acceleration).max(-self.max_speed / 2.0);
            true
        } else {
            self.speed *= 1.0 - self.deceleration;
            false
        };

        self.nitro_active = boosting;
        self.nitro = if self.nitro_active {
            (self.nitro - NITRO_DRAIN).max(0.0)
        } else {
            (self.nitro + NITRO_RECHARGE).min(NITRO_MAX)
        };

        if controls.brake {
            self.speed *= BRAKE_FACTOR;
        }

        // No speed, no pivot
        let steer = self.turn_rate * (self.speed / self.max_speed);
        if controls.left {
            self.angle -= steer;
        }
        if controls.right {
            self.angle += steer;
        }

        powered
    }

    /// Move along the heading and clamp to the viewport
    pub fn integrate(&mut self, viewport: Viewport) {
        self.pos.x += self.angle.sin() * self.speed;
        self.pos.y -= self.angle.cos() * self.speed;

        let half = self.half_extents();
        self.pos.x = self.pos.x.max(half.x).min(viewport.width - half.x);
        self.pos.y = self.pos.y.max(half.y).min(viewport.height - half.y);
    }

    /// Count down timed effects, restoring handling as they lapse
    pub fn tick_effects(&mut self) {
        if self.slick_ticks > 0 {
            self.slick_ticks -= 1;
            if self.slick_ticks == 0 {
                self.turn_rate = TURN_RATE;
            }
        }
        if self.shield_ticks > 0 {
            self.shield_ticks -= 1;
            if self.shield_ticks == 0 {
                self.shield = false;
            }
        }
    }

    /// Skid on oil: lose grip and some speed, recover after a while
    pub fn hit_slick(&mut self) {
        self.speed *= SLICK_SPEED_FACTOR;
        self.turn_rate *= SLICK_TURN_FACTOR;
        self.slick_ticks = SLICK_DURATION_TICKS;
    }

    /// Arm (or re-arm) the shield for its full duration
    pub fn raise_shield(&mut self) {
        self.shield = true;
        self.shield_ticks = SHIELD_DURATION_TICKS;
    }
}

/// Engine tone for a given speed: (frequency Hz, volume)
pub fn engine_tone(speed: f32) -> (f32, f32) {
    let speed = speed.abs();
    (100.0 + speed * 20.0, 0.05 + speed * 0.01)
}

/// Car physics stage of the tick
pub fn update_car(state: &mut GameState, controls: &Controls, viewport: Viewport) {
    let powered = state.car.apply_controls(controls);
    state.car.integrate(viewport);

    let car = &state.car;
    state.track.advance(car.speed * car.angle.sin());
    state.track.travel(car.speed * car.angle.cos() * TRAVEL_SCALE);

    if powered {
        if !state.engine_running {
            state.engine_running = true;
            state.events.push(GameEvent::EngineStart);
        }
        let (frequency, volume) = engine_tone(state.car.speed);
        state
            .events
            .push(GameEvent::EngineUpdate { frequency, volume });
    } else if state.car.speed.abs() < ENGINE_IDLE_SPEED {
        state.stop_engine();
    }
}
