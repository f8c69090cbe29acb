//! Per-frame display list
//!
//! Layers are emitted back to front: road, car, obstacles, collectibles,
//! then the minimap overlay. Every world layer is faded by the day/night
//! intensity; the minimap and the clear color are not.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, fade};
use crate::error::RenderError;
use crate::rgb_to_f32;
use crate::sim::car::Car;
use crate::sim::entity::{Collectible, CollectibleKind, Obstacle, ObstacleKind};
use crate::sim::state::{GameState, Viewport};
use crate::sim::track::ProjectedSegment;

/// Segments shown on the minimap strip
const MINIMAP_SEGMENTS: usize = 30;
const MINIMAP_OBSTACLES: usize = 10;
const MINIMAP_COLLECTIBLES: usize = 5;
const MINIMAP_SIZE: Vec2 = Vec2::new(150.0, 60.0);
const MINIMAP_MARGIN: f32 = 10.0;

const CIRCLE_SEGMENTS: u32 = 24;

/// A finished display list, in pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear: [f32; 4],
    pub vertices: Vec<Vertex>,
}

impl Frame {
    /// Static "something went wrong" frame: a warning mark on black.
    /// The host overlays the restart message.
    pub fn fault(viewport: Viewport) -> Frame {
        let center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
        let mut vertices = shapes::rect(
            center.x - 4.0,
            center.y - 40.0,
            8.0,
            50.0,
            colors::FAULT_MARK,
        );
        vertices.extend(shapes::rect(
            center.x - 4.0,
            center.y + 20.0,
            8.0,
            8.0,
            colors::FAULT_MARK,
        ));
        Frame {
            clear: colors::FAULT_BACKGROUND,
            vertices,
        }
    }
}

/// Render toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub show_minimap: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { show_minimap: true }
    }
}

/// Something that knows how to tessellate itself
pub trait Draw {
    fn draw(&self, out: &mut Vec<Vertex>, alpha: f32);
}

/// Bumper and window strip heights
#[derive(Debug, Clone, Copy)]
struct BodyStyle {
    trim: f32,
    window: f32,
}

const PLAYER_BODY: BodyStyle = BodyStyle {
    trim: 10.0,
    window: 6.0,
};
const TRAFFIC_BODY: BodyStyle = BodyStyle {
    trim: 8.0,
    window: 4.0,
};

/// Body, bumpers and windows shared by the player car and traffic
fn draw_car_body(
    out: &mut Vec<Vertex>,
    center: Vec2,
    half: Vec2,
    angle: f32,
    color: [f32; 4],
    style: BodyStyle,
    alpha: f32,
) {
    out.extend(shapes::rotated_rect(center, half, angle, color));

    let (w, h) = (half.x, half.y);
    let BodyStyle { trim, window } = style;
    for (top, height) in [(-h + 5.0, trim), (h - 5.0 - trim, trim)] {
        out.extend(shapes::local_rect(
            center,
            angle,
            Vec2::new(-w + 2.0, top),
            Vec2::new(w - 2.0, top + height),
            fade(colors::TRIM, alpha),
        ));
    }
    for (top, height) in [(-h + 8.0, window), (h - 8.0 - window + 1.0, window)] {
        out.extend(shapes::local_rect(
            center,
            angle,
            Vec2::new(-w + 4.0, top),
            Vec2::new(w - 4.0, top + height),
            fade(colors::WINDOW, alpha),
        ));
    }
}

impl Draw for Car {
    fn draw(&self, out: &mut Vec<Vertex>, alpha: f32) {
        let half = self.half_extents();
        if self.nitro_active {
            out.extend(shapes::rotated_rect(
                self.pos,
                half + Vec2::splat(5.0),
                self.angle,
                fade(colors::NITRO_GLOW, alpha),
            ));
        }
        draw_car_body(
            out,
            self.pos,
            half,
            self.angle,
            rgb_to_f32(self.color, alpha),
            PLAYER_BODY,
            alpha,
        );
        if self.shield {
            let r = half.length() + 4.0;
            out.extend(shapes::ring(
                self.pos,
                r,
                r + 3.0,
                fade(colors::SHIELD_RING, alpha),
                CIRCLE_SEGMENTS,
            ));
        }
    }
}

fn draw_oil_slick(o: &Obstacle, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(o.kind.color(), alpha);
    out.extend(shapes::circle(o.pos, o.size.x / 2.0, color, CIRCLE_SEGMENTS));
    let shine = o.pos + Vec2::new(-o.size.x / 4.0, -o.size.y / 4.0);
    out.extend(shapes::circle(
        shine,
        o.size.x / 6.0,
        fade(colors::OIL_SHINE, alpha),
        CIRCLE_SEGMENTS / 2,
    ));
}

fn draw_moving_vehicle(o: &Obstacle, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(o.kind.color(), alpha);
    draw_car_body(
        out,
        o.pos,
        o.half_extents(),
        o.angle,
        color,
        TRAFFIC_BODY,
        alpha,
    );
}

fn draw_block(o: &Obstacle, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(o.kind.color(), alpha);
    out.extend(shapes::rotated_rect(o.pos, o.half_extents(), o.angle, color));
}

impl Draw for Obstacle {
    fn draw(&self, out: &mut Vec<Vertex>, alpha: f32) {
        match self.kind {
            ObstacleKind::OilSlick => draw_oil_slick(self, out, alpha),
            ObstacleKind::MovingVehicle => draw_moving_vehicle(self, out, alpha),
            ObstacleKind::Static | ObstacleKind::Roadblock => draw_block(self, out, alpha),
        }
    }
}

fn draw_coin(c: &Collectible, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(c.kind.color(), alpha);
    out.extend(shapes::circle(c.pos, c.radius, color, CIRCLE_SEGMENTS));
    out.extend(shapes::circle(
        c.pos,
        c.radius - 3.0,
        fade(colors::COIN_FACE, alpha),
        CIRCLE_SEGMENTS,
    ));
    // Embossed mark turning with the coin
    out.extend(shapes::rotated_rect(
        c.pos,
        Vec2::new(1.5, c.radius / 2.0),
        c.angle,
        color,
    ));
}

fn draw_star(c: &Collectible, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(c.kind.color(), alpha);
    out.extend(shapes::star(c.pos, c.radius, c.angle, color));
}

fn draw_fuel(c: &Collectible, out: &mut Vec<Vertex>, alpha: f32) {
    let r = c.radius;
    let layers = [
        (r, rgb_to_f32(c.kind.color(), alpha)),
        (r - 2.0, fade(colors::TRIM, alpha)),
        (r - 4.0, rgb_to_f32(c.kind.color(), alpha)),
    ];
    for (half, color) in layers {
        out.extend(shapes::rotated_rect(c.pos, Vec2::splat(half), c.angle, color));
    }
}

fn draw_shield(c: &Collectible, out: &mut Vec<Vertex>, alpha: f32) {
    let color = rgb_to_f32(c.kind.color(), alpha);
    out.extend(shapes::circle(c.pos, c.radius, color, CIRCLE_SEGMENTS));
    out.extend(shapes::circle(
        c.pos,
        c.radius - 3.0,
        fade(colors::WINDOW, alpha),
        CIRCLE_SEGMENTS,
    ));
}

impl Draw for Collectible {
    fn draw(&self, out: &mut Vec<Vertex>, alpha: f32) {
        match self.kind {
            CollectibleKind::Coin => draw_coin(self, out, alpha),
            CollectibleKind::Star => draw_star(self, out, alpha),
            CollectibleKind::Fuel => draw_fuel(self, out, alpha),
            CollectibleKind::Shield => draw_shield(self, out, alpha),
        }
    }
}

/// One road slice: band across the frame, borders outside the road edges,
/// and a lane mark on every other slice
fn draw_segment(seg: &ProjectedSegment, viewport: Viewport, out: &mut Vec<Vertex>, alpha: f32) {
    let top = seg.far.y;
    let height = seg.near.y - seg.far.y;
    if height <= 0.0 {
        return;
    }
    let center = seg.far.x;
    let band = rgb_to_f32(seg.band.rgb(), alpha);
    let border = fade(colors::ROAD_BORDER, alpha);

    out.extend(shapes::rect(0.0, top, viewport.width, height, band));

    let left_edge = (center - seg.far.w).max(0.0);
    let right_edge = (center + seg.far.w).min(viewport.width);
    if left_edge > 0.0 {
        out.extend(shapes::rect(0.0, top, left_edge, height, border));
    }
    if right_edge < viewport.width {
        out.extend(shapes::rect(
            right_edge,
            top,
            viewport.width - right_edge,
            height,
            border,
        ));
    }

    if seg.n % 2 == 1 {
        out.extend(shapes::rect(
            center - 2.0,
            top,
            4.0,
            height,
            fade(colors::LANE_MARK, alpha),
        ));
    }
}

fn draw_minimap(state: &GameState, viewport: Viewport, out: &mut Vec<Vertex>) {
    let origin = Vec2::new(
        viewport.width - MINIMAP_SIZE.x - MINIMAP_MARGIN,
        MINIMAP_MARGIN,
    );
    let mid_y = origin.y + MINIMAP_SIZE.y / 2.0;
    let to_map = |x: f32| origin.x + (x / viewport.width).clamp(0.0, 1.0) * MINIMAP_SIZE.x;

    out.extend(shapes::rect(
        origin.x,
        origin.y,
        MINIMAP_SIZE.x,
        MINIMAP_SIZE.y,
        colors::MINIMAP_GRASS,
    ));

    let count = MINIMAP_SEGMENTS.min(state.track.segments.len());
    if count > 0 {
        let seg_w = MINIMAP_SIZE.x / count as f32;
        for i in 0..count {
            let x = origin.x + i as f32 * seg_w;
            out.extend(shapes::rect(x, mid_y - 10.0, seg_w, 20.0, colors::MINIMAP_ROAD));
            out.extend(shapes::rect(
                x + seg_w / 2.0 - 1.0,
                mid_y - 10.0,
                2.0,
                20.0,
                colors::LANE_MARK,
            ));
        }
    }

    let car = Vec2::new(to_map(state.car.pos.x), mid_y);
    out.extend(shapes::circle(car, 4.0, rgb_to_f32(state.car.color, 1.0), 12));
    let heading = car + Vec2::new(state.car.angle.sin(), -state.car.angle.cos()) * 8.0;
    out.extend(shapes::line(car, heading, 2.0, colors::LANE_MARK));

    for o in state.obstacles.iter().take(MINIMAP_OBSTACLES) {
        let x = to_map(o.pos.x);
        out.extend(shapes::rect(
            x - 2.0,
            mid_y - 2.0,
            4.0,
            4.0,
            rgb_to_f32(o.kind.color(), 1.0),
        ));
    }
    for c in state.collectibles.iter().take(MINIMAP_COLLECTIBLES) {
        let at = Vec2::new(to_map(c.pos.x), mid_y);
        out.extend(shapes::circle(at, 3.0, rgb_to_f32(c.kind.color(), 1.0), 10));
    }
}

/// Build the display list for the current state
pub fn build_frame(
    state: &GameState,
    viewport: Viewport,
    options: SceneOptions,
) -> Result<Frame, RenderError> {
    if !viewport.has_area() {
        return Err(RenderError::EmptyViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    if !(state.car.pos.is_finite() && state.car.angle.is_finite()) {
        return Err(RenderError::NonFiniteGeometry("car"));
    }
    if state.obstacles.iter().any(|o| !o.pos.is_finite()) {
        return Err(RenderError::NonFiniteGeometry("obstacle"));
    }
    if state.collectibles.iter().any(|c| !c.pos.is_finite()) {
        return Err(RenderError::NonFiniteGeometry("collectible"));
    }

    let level = state.current_level();
    let clear = rgb_to_f32(state.lighting.background(level.background), 1.0);
    let alpha = state.lighting.intensity();

    let mut vertices = Vec::with_capacity(4096);

    // Road, far slices first so nearer ones paint over them
    let road = state.track.visible(viewport);
    for seg in road.iter().rev() {
        draw_segment(seg, viewport, &mut vertices, alpha);
    }

    state.car.draw(&mut vertices, alpha);
    for obstacle in &state.obstacles {
        obstacle.draw(&mut vertices, alpha);
    }
    for collectible in &state.collectibles {
        collectible.draw(&mut vertices, alpha);
    }

    if options.show_minimap {
        draw_minimap(state, viewport, &mut vertices);
    }

    Ok(Frame { clear, vertices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NIGHT_COLOR;
    use crate::sim::car::CAR_SKINS;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn running() -> GameState {
        let mut state = GameState::new(21, VIEW);
        state.start_run(CAR_SKINS[0], VIEW);
        state
    }

    fn no_minimap() -> SceneOptions {
        SceneOptions {
            show_minimap: false,
        }
    }

    #[test]
    fn test_clear_color_follows_day_night() {
        let mut state = running();
        let day = build_frame(&state, VIEW, no_minimap()).unwrap();
        assert_eq!(day.clear, rgb_to_f32([0x87, 0xce, 0xeb], 1.0));

        state.lighting.phase = 1.0;
        let night = build_frame(&state, VIEW, no_minimap()).unwrap();
        assert_eq!(night.clear, rgb_to_f32(NIGHT_COLOR, 1.0));
    }

    #[test]
    fn test_world_layers_fade_at_night() {
        let mut state = running();
        state.lighting.phase = 1.0;
        let frame = build_frame(&state, VIEW, no_minimap()).unwrap();
        assert!(!frame.vertices.is_empty());
        assert!(frame.vertices.iter().all(|v| v.color[3] <= 0.5 + 1e-6));
    }

    #[test]
    fn test_minimap_is_not_faded() {
        let mut state = running();
        state.lighting.phase = 1.0;
        let without = build_frame(&state, VIEW, no_minimap()).unwrap();
        let with = build_frame(&state, VIEW, SceneOptions::default()).unwrap();
        let overlay = &with.vertices[without.vertices.len()..];
        assert!(!overlay.is_empty());
        assert!(overlay.iter().all(|v| v.color[3] == 1.0));
    }

    #[test]
    fn test_nitro_and_shield_add_geometry() {
        let mut state = running();
        let plain = build_frame(&state, VIEW, no_minimap()).unwrap().vertices.len();
        state.car.nitro_active = true;
        let glowing = build_frame(&state, VIEW, no_minimap()).unwrap().vertices.len();
        assert_eq!(glowing, plain + 6);
        state.car.raise_shield();
        let shielded = build_frame(&state, VIEW, no_minimap()).unwrap().vertices.len();
        assert_eq!(shielded, glowing + CIRCLE_SEGMENTS as usize * 6);
    }

    #[test]
    fn test_each_variant_has_its_own_routine() {
        let mut counts = Vec::new();
        for kind in CollectibleKind::ALL {
            let mut out = Vec::new();
            Collectible::new(kind, Vec2::new(100.0, 100.0), 2.0).draw(&mut out, 1.0);
            counts.push(out.len());
        }
        // coin: two discs + mark, star: 10 wedges, fuel: 3 squares, shield: 2 discs
        let disc = CIRCLE_SEGMENTS as usize * 3;
        assert_eq!(counts, vec![2 * disc + 6, 30, 18, 2 * disc]);
    }

    #[test]
    fn test_empty_viewport_is_an_error() {
        let state = running();
        let result = build_frame(&state, Viewport::new(0.0, 600.0), no_minimap());
        assert!(matches!(result, Err(RenderError::EmptyViewport { .. })));
    }

    #[test]
    fn test_non_finite_car_is_an_error() {
        let mut state = running();
        state.car.pos.x = f32::INFINITY;
        assert_eq!(
            build_frame(&state, VIEW, no_minimap()),
            Err(RenderError::NonFiniteGeometry("car"))
        );
    }

    #[test]
    fn test_missing_track_still_renders() {
        let mut state = running();
        state.track.segments.clear();
        let frame = build_frame(&state, VIEW, SceneOptions::default()).unwrap();
        assert!(!frame.vertices.is_empty());
    }

    #[test]
    fn test_fault_frame_is_static() {
        let a = Frame::fault(VIEW);
        let b = Frame::fault(VIEW);
        assert_eq!(a, b);
        assert_eq!(a.clear, colors::FAULT_BACKGROUND);
    }
}
