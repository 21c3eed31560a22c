use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use serde::Deserialize;

use crate::backend::{BodyState, PhysicsBackend};
use crate::convert::vec3_to_rapier;
use crate::world::PhysicsWorld;

/// Spawn parameters for a dynamic sphere
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SphereBodyConfig {
    /// Initial position
    pub position: [f32; 3],
    pub radius: f32,
    pub mass: f32,
}

impl Default for SphereBodyConfig {
    fn default() -> Self {
        Self {
            position: [17.2, 10.0, 23.0],
            radius: 1.0,
            mass: 3.0,
        }
    }
}

/// A dynamic ball in the physics world
///
/// A thin wrapper around a rigid body handle and its collider handle. The
/// body is owned by the [`PhysicsWorld`]; state is read back through it.
#[derive(Debug, Clone, Copy)]
pub struct SphereBody {
    pub(crate) body_handle: RigidBodyHandle,
    pub(crate) collider_handle: ColliderHandle,
    radius: f32,
}

impl SphereBody {
    /// Create a dynamic sphere and its collider
    ///
    /// # Arguments
    /// * `world` - The physics world to add the body to
    /// * `config` - Position, radius and mass
    pub fn spawn(world: &mut PhysicsWorld, config: &SphereBodyConfig) -> Self {
        let body = RigidBodyBuilder::dynamic()
            .translation(vec3_to_rapier(Vec3::from(config.position)))
            .build();
        let body_handle = world.add_rigid_body(body);

        let collider = ColliderBuilder::ball(config.radius).mass(config.mass).build();
        let collider_handle = world.add_collider(collider, body_handle);

        Self {
            body_handle,
            collider_handle,
            radius: config.radius,
        }
    }

    /// Get the body handle
    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body_handle
    }

    /// Get the collider handle
    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider_handle
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Current position, or zero if the body was removed
    pub fn position(&self, world: &PhysicsWorld) -> Vec3 {
        self.state(world).position
    }

    /// Current linear velocity, or zero if the body was removed
    pub fn velocity(&self, world: &PhysicsWorld) -> Vec3 {
        self.state(world).velocity
    }

    /// Current rotation, or identity if the body was removed
    pub fn rotation(&self, world: &PhysicsWorld) -> Quat {
        self.state(world).orientation
    }

    /// Mass as seen by the solver (collider mass plus any additional mass)
    pub fn mass(&self, world: &PhysicsWorld) -> f32 {
        world
            .get_rigid_body(self.body_handle)
            .map(|body| body.mass())
            .unwrap_or(0.0)
    }

    fn state(&self, world: &PhysicsWorld) -> BodyState {
        world.body_state(self.body_handle).unwrap_or_default()
    }

    /// Check if this rigid body is still valid in the world
    pub fn is_valid(&self, world: &PhysicsWorld) -> bool {
        world.get_rigid_body(self.body_handle).is_some()
    }
}
