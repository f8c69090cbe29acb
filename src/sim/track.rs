//! Pseudo-3D road model
//!
//! A finite ring of segments repeated forever. Logical segment `i` maps onto
//! backing segment `i mod SEGMENT_COUNT`, but keeps its own depth so the road
//! never folds back on itself when the ring wraps.

use glam::Vec3;

use super::projection::{ScreenPoint, project};
use super::state::Viewport;

pub const SEGMENT_COUNT: usize = 500;
pub const SEGMENT_LENGTH: f32 = 200.0;
pub const ROAD_WIDTH: f32 = 2000.0;
pub const CAMERA_HEIGHT: f32 = 1000.0;
pub const CAMERA_DEPTH: f32 = 0.84;
/// Segments considered per frame
pub const DRAW_DISTANCE: usize = 100;
/// Segments per color band
pub const BAND_LENGTH: usize = 3;
/// World depth travelled per unit of forward speed
pub const TRAVEL_SCALE: f32 = 10.0;

const CURVE_STEP: f32 = 0.01;
const CURVE_AMPLITUDE: f32 = 2.0;
/// Lateral world shift contributed by one unit of curvature
const CURVE_GAIN: f32 = 50.0;

/// Road surface banding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Light,
    Dark,
}

impl Band {
    pub fn for_index(index: usize) -> Self {
        if (index / BAND_LENGTH) % 2 == 0 {
            Band::Light
        } else {
            Band::Dark
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Band::Light => [0x69, 0x69, 0x69],
            Band::Dark => [0x60, 0x60, 0x60],
        }
    }
}

/// One slice of road
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// World depth of the near boundary
    pub near_z: f32,
    /// World depth of the far boundary
    pub far_z: f32,
    pub curve: f32,
    pub band: Band,
}

/// A segment as seen from the camera this frame
#[derive(Debug, Clone, Copy)]
pub struct ProjectedSegment {
    /// Position within the draw window (0 = nearest)
    pub n: usize,
    pub index: usize,
    pub band: Band,
    pub near: ScreenPoint,
    pub far: ScreenPoint,
}

/// The road: segments plus the camera travelling along them
#[derive(Debug, Clone)]
pub struct Track {
    pub segments: Vec<Segment>,
    /// Camera lateral offset (world units)
    pub x: f32,
    /// Distance travelled along the road (world units)
    pub z: f32,
    pub curve_intensity: f32,
}

impl Track {
    pub fn new(curve_intensity: f32) -> Self {
        let mut track = Self {
            segments: Vec::with_capacity(SEGMENT_COUNT),
            x: 0.0,
            z: 0.0,
            curve_intensity,
        };
        track.rebuild(curve_intensity);
        track
    }

    /// Regenerate every segment for a new curve intensity
    pub fn rebuild(&mut self, curve_intensity: f32) {
        self.curve_intensity = curve_intensity;
        self.segments.clear();
        for i in 0..SEGMENT_COUNT {
            self.segments.push(Segment {
                index: i,
                near_z: i as f32 * SEGMENT_LENGTH,
                far_z: (i + 1) as f32 * SEGMENT_LENGTH,
                curve: (i as f32 * CURVE_STEP * curve_intensity).sin() * CURVE_AMPLITUDE,
                band: Band::for_index(i),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Shift the camera sideways (player steering)
    pub fn advance(&mut self, dx: f32) {
        self.x += dx;
    }

    /// Move the camera along the road
    pub fn travel(&mut self, dz: f32) {
        self.z += dz;
    }

    /// Logical index of the segment under the camera
    pub fn base_index(&self) -> i64 {
        (self.z / SEGMENT_LENGTH).floor() as i64
    }

    /// Camera position; it trails one segment behind the travel point so the
    /// base segment is always strictly ahead of the camera plane.
    pub fn camera(&self) -> Vec3 {
        Vec3::new(self.x, CAMERA_HEIGHT, self.z - SEGMENT_LENGTH)
    }

    /// Project the draw window, nearest first
    pub fn visible(&self, viewport: Viewport) -> Vec<ProjectedSegment> {
        let mut out = Vec::with_capacity(DRAW_DISTANCE);
        if self.segments.is_empty() {
            return out;
        }

        let len = self.segments.len() as i64;
        let base = self.base_index();
        let camera = self.camera();
        let mut curve_x = 0.0;
        let mut curve_dx = 0.0;

        for n in 0..DRAW_DISTANCE {
            let logical = base + n as i64;
            let segment = &self.segments[logical.rem_euclid(len) as usize];
            let lap = logical.div_euclid(len) as f32 * len as f32 * SEGMENT_LENGTH;

            let near_world = Vec3::new(curve_x, 0.0, segment.near_z + lap);
            let far_world = Vec3::new(curve_x + curve_dx, 0.0, segment.far_z + lap);
            curve_x += curve_dx;
            curve_dx += segment.curve * CURVE_GAIN;

            let (Some(near), Some(far)) = (
                project(near_world, camera, CAMERA_DEPTH, ROAD_WIDTH, viewport),
                project(far_world, camera, CAMERA_DEPTH, ROAD_WIDTH, viewport),
            ) else {
                continue;
            };
            if !(near.y.is_finite() && far.y.is_finite()) {
                continue;
            }

            // Segment lies entirely below the frame
            if far.y >= viewport.height {
                break;
            }

            out.push(ProjectedSegment {
                n,
                index: segment.index,
                band: segment.band,
                near,
                far,
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_segments_are_continuous() {
        let track = Track::new(0.5);
        assert_eq!(track.segments.len(), SEGMENT_COUNT);
        for pair in track.segments.windows(2) {
            assert_eq!(pair[0].far_z, pair[1].near_z);
        }
    }

    #[test]
    fn test_banding_alternates_every_three() {
        let track = Track::new(0.5);
        let bands: Vec<Band> = track.segments[..9].iter().map(|s| s.band).collect();
        assert_eq!(
            bands,
            vec![
                Band::Light,
                Band::Light,
                Band::Light,
                Band::Dark,
                Band::Dark,
                Band::Dark,
                Band::Light,
                Band::Light,
                Band::Light
            ]
        );
    }

    #[test]
    fn test_rebuild_changes_curvature() {
        let mut track = Track::new(0.5);
        let before: Vec<f32> = track.segments.iter().map(|s| s.curve).collect();
        track.rebuild(0.8);
        let after: Vec<f32> = track.segments.iter().map(|s| s.curve).collect();
        assert_eq!(before[0], after[0]); // sin(0) either way
        assert_ne!(before[100], after[100]);
        assert!((after[100] - (100.0f32 * 0.01 * 0.8).sin() * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_base_index_floors() {
        let mut track = Track::new(0.5);
        assert_eq!(track.base_index(), 0);
        track.travel(SEGMENT_LENGTH * 2.5);
        assert_eq!(track.base_index(), 2);
        track.travel(-SEGMENT_LENGTH * 3.0);
        assert_eq!(track.base_index(), -1);
    }

    #[test]
    fn test_visible_window_is_ahead_of_camera() {
        let mut track = Track::new(1.0);
        track.travel(1234.0);
        let visible = track.visible(VIEW);
        assert!(!visible.is_empty());
        assert!(visible.len() <= DRAW_DISTANCE);
        for seg in &visible {
            assert!(seg.near.camera.z > 0.0);
            assert!(seg.far.camera.z > seg.near.camera.z);
            // Farther boundaries sit closer to the horizon
            assert!(seg.far.y <= seg.near.y);
        }
    }

    #[test]
    fn test_visible_window_wraps_with_continuous_depth() {
        let mut track = Track::new(1.0);
        track.travel((SEGMENT_COUNT as f32 - 10.0) * SEGMENT_LENGTH);
        let visible = track.visible(VIEW);
        let wrapped: Vec<_> = visible.iter().filter(|s| s.index < 10).collect();
        assert!(!wrapped.is_empty(), "window should cross the end of the ring");
        for pair in visible.windows(2) {
            let gap = pair[1].near.camera.z - pair[0].far.camera.z;
            assert!(gap.abs() < 1e-3, "road depth must stay continuous");
        }
    }

    #[test]
    fn test_tiny_viewport_stops_early() {
        let track = Track::new(0.5);
        let tiny = Viewport {
            width: 4.0,
            height: 4.0,
        };
        assert!(track.visible(tiny).is_empty());
    }

    #[test]
    fn test_steering_shifts_camera() {
        let mut track = Track::new(0.5);
        let straight = track.visible(VIEW);
        track.advance(500.0);
        let steered = track.visible(VIEW);
        assert!(steered[0].near.x < straight[0].near.x);
    }
}
