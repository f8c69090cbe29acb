//! Collision detection and effect resolution
//!
//! Obstacles are boxes, collectibles are circles, the car is a box for
//! obstacle tests and a circle of half its width for pickups. Touching edges
//! never count as a hit.

use glam::Vec2;

use super::entity::{CollectibleEffect, ObstacleEffect};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Strict overlap of two axis-aligned boxes given centers and half extents
#[inline]
pub fn aabb_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let d = (a_center - b_center).abs();
    d.x < a_half.x + b_half.x && d.y < a_half.y + b_half.y
}

/// Strict overlap of two circles
#[inline]
pub fn circle_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    a_center.distance(b_center) < a_radius + b_radius
}

/// Summary of one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub crashes: u32,
    pub absorbed: u32,
    pub slicks: u32,
    pub pickups: u32,
}

/// Collision stage of the tick.
///
/// Entities are visited last-to-first so in-place removal never skips one.
/// The pass stops the moment the run ends.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let car_half = state.car.half_extents();

    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;
        let obstacle = &state.obstacles[i];
        if !aabb_overlap(state.car.pos, car_half, obstacle.pos, obstacle.half_extents()) {
            continue;
        }

        match obstacle.effect() {
            ObstacleEffect::Crash if state.car.shield => {
                state.obstacles.remove(i);
                state.events.push(GameEvent::Collision);
                report.absorbed += 1;
            }
            ObstacleEffect::Crash => {
                state.obstacles.remove(i);
                state.lives = state.lives.saturating_sub(1);
                state.car.speed *= CRASH_SPEED_FACTOR;
                state.events.push(GameEvent::Collision);
                report.crashes += 1;

                if state.lives == 0 {
                    state.game_over();
                    return report;
                }
            }
            ObstacleEffect::Slippery => {
                state.car.hit_slick();
                report.slicks += 1;
            }
        }
    }

    let car_radius = state.car.width / 2.0;
    let mut i = state.collectibles.len();
    while i > 0 {
        i -= 1;
        let item = &state.collectibles[i];
        if !circle_overlap(state.car.pos, car_radius, item.pos, item.radius) {
            continue;
        }

        let item = state.collectibles.remove(i);
        match item.effect() {
            CollectibleEffect::Score => state.score += u64::from(item.value),
            CollectibleEffect::Nitro => {
                state.car.nitro = (state.car.nitro + item.value as f32).min(NITRO_MAX);
            }
            CollectibleEffect::Shield => state.car.raise_shield(),
        }
        state.events.push(GameEvent::PowerUp);
        report.pickups += 1;
    }

    report
}
