//! Perspective projection of world points onto the screen
//!
//! The classic segment-projection technique: every road boundary is
//! translated into camera space and divided by its depth.

use glam::Vec3;

use super::state::Viewport;

/// A projected point on screen
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    /// Camera-relative coordinates
    pub camera: Vec3,
    /// cameraDepth / camera.z
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    /// Projected road half-width at this depth
    pub w: f32,
}

/// Project a world point through a camera onto the viewport.
///
/// Returns `None` when the point lies on or behind the camera plane, where
/// the perspective divide degenerates.
pub fn project(
    world: Vec3,
    camera: Vec3,
    camera_depth: f32,
    road_width: f32,
    viewport: Viewport,
) -> Option<ScreenPoint> {
    let rel = world - camera;
    if rel.z <= f32::EPSILON {
        return None;
    }

    let scale = camera_depth / rel.z;
    Some(ScreenPoint {
        camera: rel,
        scale,
        x: (viewport.width / 2.0 + rel.x * scale).round(),
        y: (viewport.height / 2.0 - rel.y * scale).round(),
        w: (road_width * scale).round(),
    })
}
