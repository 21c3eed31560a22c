use glam::{Quat, Vec3};
use rapier3d::prelude::RigidBodyHandle;
use terrain::CollisionVolume;

use crate::error::Result;
use crate::terrain_collider::CollisionMode;

/// Snapshot of a dynamic body's kinematic state, in glam types
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// The slice of a physics engine the frame loop drives
///
/// Implemented by [`PhysicsWorld`](crate::PhysicsWorld). Tests substitute
/// recording mocks to observe call order.
pub trait PhysicsBackend {
    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Read a body's pose and velocity, `None` if the handle is unknown
    fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState>;

    /// Teleport a body and overwrite its linear velocity
    ///
    /// Returns false if the handle is unknown.
    fn reset_body(&mut self, handle: RigidBodyHandle, position: Vec3, velocity: Vec3) -> bool;

    /// Install the static terrain shape built from `volume`
    ///
    /// Fails without side effects if the engine rejects the volume.
    fn attach_terrain(&mut self, volume: &CollisionVolume, mode: CollisionMode) -> Result<()>;
}
