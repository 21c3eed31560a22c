//! Error types for terrain construction

use thiserror::Error;

/// Result type for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;

/// Errors that can occur while building terrain geometry
#[derive(Error, Debug)]
pub enum TerrainError {
    /// Pixel buffer is shorter than the dimensions require
    #[error("Pixel buffer out of range: need {needed} bytes, got {len}")]
    OutOfRange { needed: usize, len: usize },

    /// Grid has a zero dimension
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Height sequence does not cover the grid
    #[error("Height count mismatch: expected {expected}, got {actual}")]
    HeightCountMismatch { expected: usize, actual: usize },

    /// Heightmap image could not be decoded
    #[error("Heightmap decode error: {0}")]
    Decode(#[from] image::ImageError),
}
