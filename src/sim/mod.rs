//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One fixed step per displayed frame
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entities)
//! - No rendering or platform dependencies

pub mod car;
pub mod collision;
pub mod entity;
pub mod level;
pub mod lighting;
pub mod progression;
pub mod projection;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use car::{CAR_SKINS, Car, CarSkin, engine_tone, update_car};
pub use collision::{CollisionReport, aabb_overlap, circle_overlap, resolve_collisions};
pub use entity::{
    Collectible, CollectibleEffect, CollectibleKind, Obstacle, ObstacleEffect, ObstacleKind, Weave,
};
pub use level::{LEVELS, Level};
pub use lighting::DayNight;
pub use progression::check_level_up;
pub use projection::{ScreenPoint, project};
pub use spawn::update_entities;
pub use state::{GameEvent, GameState, RunPhase, Viewport};
pub use tick::{TickInput, tick};
pub use track::{Band, ProjectedSegment, Segment, Track};
