//! Error types for the simulation, renderer and storage layers

use thiserror::Error;

/// Faults detected by the update pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("car state is not finite (pos=({x}, {y}), speed={speed})")]
    NonFiniteCar { x: f32, y: f32, speed: f32 },
    #[error("{kind} at index {index} has a non-finite position")]
    NonFiniteEntity { kind: &'static str, index: usize },
}

/// Faults raised while building a frame
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("viewport has no area ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
    #[error("non-finite geometry for {0}")]
    NonFiniteGeometry(&'static str),
    #[error("GPU setup failed: {0}")]
    Gpu(String),
}

/// Faults from the persistent storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
