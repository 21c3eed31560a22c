//! Heightmap-driven terrain generation
//!
//! Turns a decoded heightmap image into the two geometries the rest of the
//! engine consumes: a renderable [`TerrainMesh`] and a static
//! [`CollisionVolume`] whose triangles are exactly the rendered ones.
//!
//! # Pipeline
//!
//! ```text
//! HeightmapImage ─► HeightmapSampler ─► HeightGrid ─► TerrainMeshBuilder ─► TerrainMesh
//!                                                                      └─► CollisionVolume
//! ```
//!
//! All stages are pure: building twice from the same input yields identical
//! output. The geometries are built once when the heightmap finishes decoding
//! and never mutated afterwards.
//!
//! # Usage
//!
//! ```ignore
//! use terrain::{HeightmapImage, HeightmapSampler, TerrainMeshBuilder, CollisionVolume};
//!
//! let image = HeightmapImage::open("assets/texture/HeightMap.png")?;
//! let grid = HeightmapSampler::default().sample_image(&image)?;
//! let mesh = TerrainMeshBuilder::new().build(&grid)?;
//! let volume = CollisionVolume::from_mesh(&mesh);
//! ```

mod collision;
mod error;
mod grid;
mod image_source;
mod mesh;
mod sampler;

pub use collision::CollisionVolume;
pub use error::{Result, TerrainError};
pub use grid::HeightGrid;
pub use image_source::HeightmapImage;
pub use mesh::{TerrainMesh, TerrainMeshBuilder, Winding};
pub use sampler::{HeightmapSampler, SamplingStrategy, BYTE_SCALE};

// Re-export for convenience
pub use glam;
