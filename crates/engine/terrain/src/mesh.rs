//! Terrain mesh generation from height grids
//!
//! One vertex per grid cell at `(x, height, z)`, two triangles per grid quad.
//! Per-vertex normals are the normalized sum of the unnormalized face normals
//! of every triangle touching the vertex, so larger triangles weigh more.

use glam::{Vec2, Vec3};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TerrainError};
use crate::grid::HeightGrid;

/// Vertex visitation order within each terrain triangle
///
/// The order decides which side a triangle faces. It is applied to the whole
/// mesh; flipping it flips every normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    /// Triangles `(tl, bl, tr)` and `(tr, bl, br)`: faces point up (+Y)
    #[default]
    CounterClockwise,

    /// Triangles `(tl, tr, bl)` and `(tr, br, bl)`: faces point down (-Y)
    ///
    /// Renderers must draw back faces to see this terrain from above.
    Clockwise,
}

/// Renderable terrain surface
///
/// `vertices`, `uvs` and `normals` share one index space: index `z * width + x`
/// addresses grid cell `(x, z)` in all three.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub width: u32,
    pub height: u32,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl TerrainMesh {
    /// Number of triangles in the mesh
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Flattened `[x, y, z, x, y, z, ...]` positions for GPU upload
    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }
}

/// Builds [`TerrainMesh`]es from [`HeightGrid`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainMeshBuilder {
    winding: Winding,
}

impl TerrainMeshBuilder {
    /// Create a builder with the default (upward facing) winding
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the triangle winding order
    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    pub fn winding(&self) -> Winding {
        self.winding
    }

    /// Build the mesh for `grid`
    ///
    /// Grids narrower than two cells on either axis have no quads and produce
    /// an empty index sequence.
    ///
    /// # Errors
    /// [`TerrainError::InvalidDimensions`] if the grid has a zero dimension.
    pub fn build(&self, grid: &HeightGrid) -> Result<TerrainMesh> {
        let (width, height) = (grid.width(), grid.height());
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }

        let vertex_count = grid.len();
        let mut vertices = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        // Single-row or single-column grids map the lone coordinate to 0
        let u_span = (width - 1).max(1) as f32;
        let v_span = (height - 1).max(1) as f32;

        for z in 0..height {
            for x in 0..width {
                let y = grid.heights()[z as usize * width as usize + x as usize];
                vertices.push(Vec3::new(x as f32, y, z as f32));
                uvs.push(Vec2::new(x as f32 / u_span, z as f32 / v_span));
            }
        }

        let indices = self.build_indices(width, height);
        let normals = compute_vertex_normals(&vertices, &indices);

        debug!(
            width,
            height,
            vertices = vertices.len(),
            triangles = indices.len() / 3,
            winding = ?self.winding,
            "Built terrain mesh"
        );

        Ok(TerrainMesh {
            width,
            height,
            vertices,
            indices,
            uvs,
            normals,
        })
    }

    fn build_indices(&self, width: u32, height: u32) -> Vec<u32> {
        // saturating_sub keeps 1-wide grids at zero quads
        let quads_x = width.saturating_sub(1);
        let quads_z = height.saturating_sub(1);
        let mut indices = Vec::with_capacity(6 * quads_x as usize * quads_z as usize);

        for z in 0..quads_z {
            for x in 0..quads_x {
                let top_left = z * width + x;
                let top_right = top_left + 1;
                let bottom_left = top_left + width;
                let bottom_right = bottom_left + 1;

                match self.winding {
                    Winding::CounterClockwise => {
                        indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                        indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
                    }
                    Winding::Clockwise => {
                        indices.extend_from_slice(&[top_left, top_right, bottom_left]);
                        indices.extend_from_slice(&[top_right, bottom_right, bottom_left]);
                    }
                }
            }
        }

        indices
    }
}

/// Area-weighted per-vertex normals
///
/// Vertices touched by no triangle get `+Y`.
fn compute_vertex_normals(vertices: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
