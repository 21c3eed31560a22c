//! Error types for the physics bridge

use thiserror::Error;

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Errors raised while handing geometry or bodies to the physics engine
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Collision volume has no faces to build a shape from
    #[error("Collision volume is empty")]
    EmptyVolume,

    /// Rapier rejected the triangle mesh
    #[error("Triangle mesh rejected: {0}")]
    TriMesh(String),

    /// No convex hull could be built, or the hull covers concave terrain
    #[error("Convex hull rejected for {vertices} vertices (degenerate or non-convex input)")]
    NonConvex { vertices: usize },
}
