//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// A colored point in pixel space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Buffer layout matching `shader.wgsl`'s `VertexInput`
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Scale a color's alpha (global intensity, translucent layers)
#[inline]
pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for fixed game elements (entity and level colors live with their types)
pub mod colors {
    pub const ROAD_BORDER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const LANE_MARK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// #333 bumpers on cars
    pub const TRIM: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    /// #87CEEB windows
    pub const WINDOW: [f32; 4] = [0.529, 0.808, 0.922, 1.0];
    pub const NITRO_GLOW: [f32; 4] = [1.0, 1.0, 0.0, 0.3];
    pub const SHIELD_RING: [f32; 4] = [0.255, 0.412, 0.882, 0.6];
    pub const OIL_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    /// #B8860B coin face
    pub const COIN_FACE: [f32; 4] = [0.722, 0.525, 0.043, 1.0];
    pub const MINIMAP_GRASS: [f32; 4] = [0.176, 0.353, 0.153, 1.0];
    pub const MINIMAP_ROAD: [f32; 4] = [0.412, 0.412, 0.412, 1.0];
    pub const FAULT_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const FAULT_MARK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
