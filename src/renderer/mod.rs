//! Rendering module
//!
//! `scene` turns the game state into a flat triangle list in pixel space;
//! `pipeline` uploads that list to WebGPU each frame.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Draw, Frame, SceneOptions, build_frame};
pub use vertex::Vertex;
