//! Collision geometry that coincides with the render mesh
//!
//! The volume reuses the mesh vertices verbatim and regroups the mesh index
//! list into triangles, so every collision facet is a rendered triangle.
//! Whether a physics back-end accepts this (generally non-convex) soup as a
//! static shape is decided where the volume is handed to the engine.

use glam::Vec3;

use crate::mesh::TerrainMesh;

/// Static collision shape derived from a [`TerrainMesh`]
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionVolume {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl CollisionVolume {
    /// Build the volume for `mesh`
    pub fn from_mesh(mesh: &TerrainMesh) -> Self {
        Self {
            vertices: mesh.vertices.clone(),
            faces: mesh.triangles().collect(),
        }
    }

    /// True when there are no faces to collide with
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Axis-aligned bounds `(min, max)` of the vertex set
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}
