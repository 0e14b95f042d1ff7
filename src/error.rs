//! Error types for the acoustic scene

use thiserror::Error;

use crate::accel::GeometryId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcousticSceneError {
    #[error("Device creation error: {0}")]
    DeviceCreation(String),

    #[error("Triangle index {index} is out of range (scene has {triangle_count} triangles)")]
    InvalidTriangleIndex { index: u32, triangle_count: usize },

    #[error("Vertex index {index} is out of range (mesh has {vertex_count} vertices)")]
    InvalidVertexIndex { index: u32, vertex_count: usize },

    #[error("Invalid listener sphere radius: {0}")]
    InvalidRadius(f32),

    #[error("Invalid reflection kernel: {0}")]
    InvalidReflectionKernel(&'static str),

    #[error("Geometry {geometry_id} has no {callback} function")]
    MissingCallback {
        geometry_id: GeometryId,
        callback: &'static str,
    },

    #[error("Geometry {geometry_id} has {count} time steps, only 1 is supported")]
    UnsupportedTimeStepCount {
        geometry_id: GeometryId,
        count: u32,
    },

    #[error("Scene holds {count} {what}, more than a 32-bit id can address")]
    TooManyPrimitives { what: &'static str, count: usize },
}

pub type Result<T> = std::result::Result<T, AcousticSceneError>;
