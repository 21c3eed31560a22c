//! Terrain assets derived from a decoded heightmap

use terrain::{
    CollisionVolume, HeightGrid, HeightmapImage, HeightmapSampler, TerrainMesh,
    TerrainMeshBuilder,
};
use tracing::info;

use crate::config::TerrainConfig;

/// Everything built from one heightmap
///
/// Built once when the heightmap arrives and never modified afterwards.
#[derive(Debug, Clone)]
pub struct TerrainAssets {
    pub grid: HeightGrid,
    pub mesh: TerrainMesh,
    pub volume: CollisionVolume,
}

impl TerrainAssets {
    /// Sample, mesh and extract the collision volume in one pass
    pub fn build(image: &HeightmapImage, config: &TerrainConfig) -> terrain::Result<Self> {
        let grid = HeightmapSampler::new(config.sampling).sample_image(image)?;
        let mesh = TerrainMeshBuilder::new()
            .with_winding(config.winding)
            .build(&grid)?;
        let volume = CollisionVolume::from_mesh(&mesh);

        info!(
            width = grid.width(),
            height = grid.height(),
            triangles = mesh.triangle_count(),
            highest_y = grid.highest_y(),
            "Built terrain"
        );
        Ok(Self { grid, mesh, volume })
    }
}
