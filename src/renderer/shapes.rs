//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in pixel coordinates (origin top
//! left, y down). Rotations are clockwise on screen for positive angles.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Rotate a local offset by `angle` radians
#[inline]
fn rotate(local: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(local)
}

fn push_quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
    out.push(Vertex::new(a.x, a.y, color));
}

/// Generate vertices for an axis-aligned rectangle from its top-left corner
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ],
        color,
    );
    vertices
}

/// Generate vertices for a rectangle given in a rotated local frame.
///
/// `min`/`max` are corners relative to `center` before rotation, so details
/// (bumpers, windows) can be placed the same way as the body they sit on.
pub fn local_rect(center: Vec2, angle: f32, min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let corners = [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ]
    .map(|p| center + rotate(p, angle));
    push_quad(&mut vertices, corners, color);
    vertices
}

/// Generate vertices for a rotated rectangle centered on `center`
pub fn rotated_rect(center: Vec2, half: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    local_rect(center, angle, -half, half, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (dir1, dir2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        push_quad(
            &mut vertices,
            [
                center + dir1 * inner_radius,
                center + dir1 * outer_radius,
                center + dir2 * outer_radius,
                center + dir2 * inner_radius,
            ],
            color,
        );
    }

    vertices
}

/// Generate vertices for a five-pointed star, first point up at `angle` 0
pub fn star(center: Vec2, radius: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    const POINTS: usize = 5;
    let inner = radius * 0.45;
    let mut vertices = Vec::with_capacity(POINTS * 2 * 3);

    let tip = |k: usize| {
        let r = if k % 2 == 0 { radius } else { inner };
        let theta = angle - PI / 2.0 + k as f32 * PI / POINTS as f32;
        center + Vec2::from_angle(theta) * r
    };

    for k in 0..POINTS * 2 {
        let a = tip(k);
        let b = tip(k + 1);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = dir.perp() * (width / 2.0);
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [from + perp, to + perp, to - perp, from - perp],
        color,
    );
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    #[test]
    fn test_rect_covers_its_box() {
        let v = rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_quarter_turn_swaps_extents() {
        let v = rotated_rect(Vec2::ZERO, Vec2::new(10.0, 20.0), PI / 2.0, [1.0; 4]);
        let (min, max) = bounds(&v);
        assert!((max.x - 20.0).abs() < 1e-4);
        assert!((max.y - 10.0).abs() < 1e-4);
        assert!((min.x + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        // The top edge (y = -1) should swing to the right (+x)
        let p = rotate(Vec2::new(0.0, -1.0), PI / 2.0);
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_circle_and_ring_stay_in_radius() {
        let c = circle(Vec2::new(5.0, 5.0), 3.0, [1.0; 4], 16);
        assert_eq!(c.len(), 48);
        for v in &c {
            assert!(Vec2::from(v.position).distance(Vec2::new(5.0, 5.0)) <= 3.0 + 1e-4);
        }
        let r = ring(Vec2::ZERO, 2.0, 4.0, [1.0; 4], 12);
        assert_eq!(r.len(), 72);
        for v in &r {
            let d = Vec2::from(v.position).length();
            assert!((2.0 - 1e-4..=4.0 + 1e-4).contains(&d));
        }
    }

    #[test]
    fn test_star_points_up() {
        let s = star(Vec2::ZERO, 10.0, 0.0, [1.0; 4]);
        assert_eq!(s.len(), 30);
        let (min, _) = bounds(&s);
        assert!((min.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_line_has_width() {
        let l = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, [1.0; 4]);
        assert_eq!(bounds(&l), (Vec2::new(0.0, -1.0), Vec2::new(10.0, 1.0)));
    }
}
