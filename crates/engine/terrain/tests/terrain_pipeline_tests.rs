//! End-to-end tests for the heightmap → mesh → collision pipeline
//!
//! These exercise the public API the way the frame loop uses it: sample a
//! pixel buffer, build the render mesh, regroup it into a collision volume.

use glam::{Vec2, Vec3};
use terrain::{
    CollisionVolume, HeightGrid, HeightmapImage, HeightmapSampler, SamplingStrategy,
    TerrainError, TerrainMeshBuilder, Winding,
};

/// RGBA buffer where every byte is `value`
fn constant_pixels(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; (width * height * 4) as usize]
}

/// RGBA buffer with a simple ramp so neighbouring cells differ
fn ramp_pixels(width: u32, height: u32) -> Vec<u8> {
    (0..width * height * 4).map(|i| (i * 7 % 251) as u8).collect()
}

const ALL_STRATEGIES: [SamplingStrategy; 3] = [
    SamplingStrategy::ByteOffset,
    SamplingStrategy::NeighborRed,
    SamplingStrategy::Channels,
];

// ============================================================================
// HeightGrid
// ============================================================================

#[test]
fn test_grid_length_matches_dimensions() {
    for (w, h) in [(1, 1), (1, 5), (5, 1), (3, 7), (16, 16)] {
        for strategy in ALL_STRATEGIES {
            let grid = HeightmapSampler::new(strategy)
                .sample(&ramp_pixels(w, h), w, h)
                .unwrap();
            assert_eq!(grid.heights().len(), (w * h) as usize);
            assert!(grid.heights().iter().all(|y| y.is_finite()));
        }
    }
}

#[test]
fn test_undersized_buffer_fails_for_every_strategy() {
    for strategy in ALL_STRATEGIES {
        let result = HeightmapSampler::new(strategy).sample(&[0u8; 63], 4, 4);
        assert!(
            matches!(result, Err(TerrainError::OutOfRange { needed: 64, len: 63 })),
            "{:?} should reject a short buffer",
            strategy
        );
    }
}

// ============================================================================
// TerrainMesh
// ============================================================================

#[test]
fn test_index_count_and_bounds() {
    for (w, h) in [(2, 2), (3, 5), (8, 4), (17, 9)] {
        let grid = HeightmapSampler::default()
            .sample(&ramp_pixels(w, h), w, h)
            .unwrap();
        let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();

        assert_eq!(mesh.indices.len(), (6 * (w - 1) * (h - 1)) as usize);
        assert_eq!(mesh.vertices.len(), (w * h) as usize);
        assert_eq!(mesh.uvs.len(), mesh.vertices.len());
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert!(mesh.indices.iter().all(|&i| i < w * h));
    }
}

#[test]
fn test_mesh_build_is_idempotent() {
    let grid = HeightmapSampler::default()
        .sample(&ramp_pixels(9, 6), 9, 6)
        .unwrap();
    let builder = TerrainMeshBuilder::new();

    let first = builder.build(&grid).unwrap();
    let second = builder.build(&grid).unwrap();

    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.indices, second.indices);
    assert_eq!(first.uvs, second.uvs);
    assert_eq!(first, second);
}

#[test]
fn test_degenerate_strips_have_no_triangles() {
    for (w, h) in [(1, 1), (1, 6), (6, 1)] {
        let grid = HeightGrid::flat(w, h, 0.0).unwrap();
        let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();
        assert!(mesh.indices.is_empty(), "{}x{} should have no triangles", w, h);

        let volume = CollisionVolume::from_mesh(&mesh);
        assert!(volume.faces.is_empty());
    }
}

#[test]
fn test_uv_corners() {
    let grid = HeightGrid::flat(5, 3, 0.0).unwrap();
    let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();

    assert_eq!(mesh.uvs[0], Vec2::new(0.0, 0.0));
    assert_eq!(*mesh.uvs.last().unwrap(), Vec2::new(1.0, 1.0));
    // Vertex (4, 0) is the far end of the first row
    assert_eq!(mesh.uvs[4], Vec2::new(1.0, 0.0));
    // Same index addresses both position and uv
    assert_eq!(mesh.vertices[4], Vec3::new(4.0, 0.0, 0.0));
}

#[test]
fn test_flat_field_normals_point_up() {
    // Any strategy that stays inside the buffer sees a constant field
    for strategy in [SamplingStrategy::ByteOffset, SamplingStrategy::Channels] {
        let grid = HeightmapSampler::new(strategy)
            .sample(&constant_pixels(4, 4, 90), 4, 4)
            .unwrap();
        let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();

        for (i, n) in mesh.normals.iter().enumerate() {
            assert!(
                (*n - Vec3::Y).length() < 1e-6,
                "Vertex {} normal should be up, got {:?}",
                i,
                n
            );
        }
    }
}

#[test]
fn test_winding_only_flips_normals() {
    let grid = HeightmapSampler::default()
        .sample(&ramp_pixels(6, 6), 6, 6)
        .unwrap();
    let ccw = TerrainMeshBuilder::new().build(&grid).unwrap();
    let cw = TerrainMeshBuilder::new()
        .with_winding(Winding::Clockwise)
        .build(&grid)
        .unwrap();

    assert_eq!(ccw.vertices, cw.vertices);
    assert_eq!(ccw.uvs, cw.uvs);
    for (a, b) in ccw.normals.iter().zip(&cw.normals) {
        assert!((*a + *b).length() < 1e-5, "{:?} should be the negation of {:?}", a, b);
    }
}

// ============================================================================
// CollisionVolume
// ============================================================================

#[test]
fn test_collision_volume_matches_mesh() {
    let grid = HeightmapSampler::default()
        .sample(&ramp_pixels(7, 5), 7, 5)
        .unwrap();
    let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();
    let volume = CollisionVolume::from_mesh(&mesh);

    assert_eq!(volume.vertices, mesh.vertices);
    assert_eq!(volume.faces.len() * 3, mesh.indices.len());
    for (face, tri) in volume.faces.iter().zip(mesh.indices.chunks_exact(3)) {
        assert_eq!(face.as_slice(), tri);
        assert!(face.iter().all(|&i| (i as usize) < volume.vertices.len()));
    }
}

#[test]
fn test_pipeline_from_decoded_image() {
    let image = image::RgbaImage::from_fn(8, 8, |x, y| {
        let v = (x * 16 + y * 8) as u8;
        image::Rgba([v, v, v, 255])
    });
    let heightmap = HeightmapImage::from_rgba(image);

    let grid = HeightmapSampler::new(SamplingStrategy::Channels)
        .sample_image(&heightmap)
        .unwrap();
    let mesh = TerrainMeshBuilder::new().build(&grid).unwrap();
    let volume = CollisionVolume::from_mesh(&mesh);

    assert_eq!(grid.width(), 8);
    assert_eq!(mesh.triangle_count(), 2 * 7 * 7);
    assert_eq!(volume.faces.len(), mesh.triangle_count());
    // Highest pixel is (7, 7): 3 * (7*16 + 7*8) / 128
    let expected = 3.0 * 168.0 / 128.0;
    assert!((grid.highest_y() - expected).abs() < 1e-5);
}
