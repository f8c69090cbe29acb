//! Entity spawning, motion and culling
//!
//! Each tick may add one entity per list (below the ceiling), then moves
//! every live entity down the screen and drops the ones that left it.

use glam::Vec2;
use rand::Rng;

use super::entity::{Collectible, CollectibleKind, Obstacle, ObstacleKind, Weave};
use super::state::{GameState, Viewport};
use crate::consts::*;

/// Fall speed of moving vehicles
const VEHICLE_SPEED: f32 = 2.0;
/// Fall speed of collectibles
const COLLECTIBLE_SPEED: f32 = 2.0;
/// Per-tick rotation of moving vehicles
const VEHICLE_SPIN: f32 = 0.02;
/// Per-tick rotation of collectibles
const COLLECTIBLE_SPIN: f32 = 0.05;

/// Fall speed of regular obstacles for a level
pub fn obstacle_speed(level: u32) -> f32 {
    3.0 + level as f32 * 0.5
}

/// Build a fresh obstacle just above the viewport
pub fn new_obstacle(kind: ObstacleKind, x: f32, level: u32, rng: &mut impl Rng) -> Obstacle {
    let (speed, weave) = match kind {
        ObstacleKind::MovingVehicle => {
            let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            (VEHICLE_SPEED, Some(Weave { direction }))
        }
        _ => (obstacle_speed(level), None),
    };
    Obstacle {
        kind,
        pos: Vec2::new(x, -OBSTACLE_MARGIN),
        size: kind.size(),
        speed,
        angle: 0.0,
        weave,
    }
}

/// Maybe spawn an obstacle, then advance and cull them all
pub fn update_obstacles(
    obstacles: &mut Vec<Obstacle>,
    rng: &mut impl Rng,
    spawn_chance: f32,
    level: u32,
    viewport: Viewport,
) {
    if obstacles.len() < MAX_OBSTACLES && rng.random::<f32>() < spawn_chance {
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        let x = rng.random::<f32>() * viewport.width;
        log::debug!("Spawned {} at x={:.0}", kind.name(), x);
        obstacles.push(new_obstacle(kind, x, level, rng));
    }

    for obstacle in obstacles.iter_mut() {
        obstacle.pos.y += obstacle.speed;

        if let Some(weave) = obstacle.weave.as_mut() {
            obstacle.pos.x += weave.direction;
            obstacle.angle += VEHICLE_SPIN;

            // Bounce off the edges
            let half = obstacle.size.x / 2.0;
            if obstacle.pos.x < half || obstacle.pos.x > viewport.width - half {
                weave.direction = -weave.direction;
            }
        }
    }

    obstacles.retain(|o| o.pos.y <= viewport.height + OBSTACLE_MARGIN);
}

/// Maybe spawn a collectible, then advance and cull them all
pub fn update_collectibles(
    collectibles: &mut Vec<Collectible>,
    rng: &mut impl Rng,
    spawn_chance: f32,
    viewport: Viewport,
) {
    if collectibles.len() < MAX_COLLECTIBLES && rng.random::<f32>() < spawn_chance {
        let kind = CollectibleKind::ALL[rng.random_range(0..CollectibleKind::ALL.len())];
        let x = rng.random::<f32>() * viewport.width;
        collectibles.push(Collectible::new(
            kind,
            Vec2::new(x, -COLLECTIBLE_MARGIN),
            COLLECTIBLE_SPEED,
        ));
    }

    for collectible in collectibles.iter_mut() {
        collectible.pos.y += collectible.speed;
        collectible.angle += COLLECTIBLE_SPIN;
    }

    collectibles.retain(|c| c.pos.y <= viewport.height + COLLECTIBLE_MARGIN);
}

/// Spawner stage of the tick
pub fn update_entities(state: &mut GameState, viewport: Viewport) {
    let level = state.current_level();
    update_obstacles(
        &mut state.obstacles,
        &mut state.rng,
        level.obstacle_rate,
        state.level,
        viewport,
    );
    update_collectibles(
        &mut state.collectibles,
        &mut state.rng,
        COLLECTIBLE_SPAWN_CHANCE,
        viewport,
    );
}
