//! Rapier colliders from terrain collision volumes
//!
//! # Collision Modes
//!
//! Three modes are available for handing a [`CollisionVolume`] to Rapier:
//!
//! - **TriMesh**: Uses a triangle mesh collider built from exactly the volume's
//!   faces. Rapier accepts arbitrary (non-convex) triangle meshes as static
//!   shapes, so the physical surface coincides with the rendered one.
//!   Best for heightmap terrain.
//!
//! - **ConvexHull**: Wraps all vertices in their convex hull, but only if the
//!   hull's upper surface matches the terrain. Terrain with valleys or dips is
//!   rejected with [`PhysicsError::NonConvex`].
//!
//! - **ConvexApproximation**: Same hull without the check. Valleys are filled
//!   in and bodies float above concave regions; a warning is logged when that
//!   happens. Only for back-ends that take nothing but convex polyhedra.
//!
//! A volume the selected mode cannot represent is an error at setup time,
//! never a silently degraded collider.

use rapier3d::parry::query::{Ray, RayCast};
use rapier3d::prelude::*;
use serde::Deserialize;
use terrain::CollisionVolume;
use tracing::warn;

use crate::convert::point_to_rapier;
use crate::error::{PhysicsError, Result};

/// Largest height by which the hull may sit above the terrain surface
pub const HULL_TOLERANCE: f32 = 1e-3;

/// Collider generation mode for terrain volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Triangle mesh matching the render mesh face for face
    #[default]
    TriMesh,

    /// Convex hull, accepted only where it matches the surface
    ConvexHull,

    /// Convex hull regardless of fit (lower fidelity)
    ConvexApproximation,
}

/// Build a static collider for `volume`
///
/// # Errors
/// * [`PhysicsError::EmptyVolume`] if the volume has no faces
/// * [`PhysicsError::TriMesh`] if Rapier rejects the triangle mesh
/// * [`PhysicsError::NonConvex`] if no hull can be built, or in
///   [`CollisionMode::ConvexHull`] if the hull covers part of the surface
pub fn build_terrain_collider(volume: &CollisionVolume, mode: CollisionMode) -> Result<Collider> {
    if volume.is_empty() {
        return Err(PhysicsError::EmptyVolume);
    }

    let points: Vec<Point<Real>> = volume.vertices.iter().copied().map(point_to_rapier).collect();

    match mode {
        CollisionMode::TriMesh => {
            // FIX_INTERNAL_EDGES stops bodies catching on shared triangle edges
            ColliderBuilder::trimesh_with_flags(
                points,
                volume.faces.clone(),
                TriMeshFlags::FIX_INTERNAL_EDGES,
            )
            .map(|builder| builder.build())
            .map_err(|err| PhysicsError::TriMesh(format!("{:?}", err)))
        }
        CollisionMode::ConvexHull | CollisionMode::ConvexApproximation => {
            let collider = ColliderBuilder::convex_hull(&points)
                .map(|builder| builder.build())
                .ok_or(PhysicsError::NonConvex {
                    vertices: points.len(),
                })?;

            let overhang = hull_overhang(&collider, volume);
            if overhang > HULL_TOLERANCE {
                if mode == CollisionMode::ConvexHull {
                    return Err(PhysicsError::NonConvex {
                        vertices: points.len(),
                    });
                }
                warn!(
                    overhang,
                    "Convex hull fills in terrain; bodies will rest above concave regions"
                );
            }
            Ok(collider)
        }
    }
}

/// Largest gap between the hull's upper surface and the terrain
///
/// Casts a ray straight down onto the hull above every face centroid and
/// compares the hit height with the centroid's own height.
fn hull_overhang(collider: &Collider, volume: &CollisionVolume) -> f32 {
    let Some(hull) = collider.shape().as_convex_polyhedron() else {
        return 0.0;
    };
    let Some((_, max)) = volume.bounds() else {
        return 0.0;
    };
    let top = max.y + 1.0;

    volume
        .faces
        .iter()
        .map(|face| {
            let centroid = face
                .iter()
                .map(|&i| volume.vertices[i as usize])
                .sum::<glam::Vec3>()
                / 3.0;
            let ray = Ray::new(
                point![centroid.x, top, centroid.z],
                vector![0.0, -1.0, 0.0],
            );
            match hull.cast_local_ray(&ray, Real::MAX, true) {
                Some(toi) => (top - toi) - centroid.y,
                None => 0.0,
            }
        })
        .fold(0.0, f32::max)
}
