use glam::Vec3;
use rapier3d::prelude::*;
use terrain::CollisionVolume;
use tracing::{debug, info};

use crate::backend::{BodyState, PhysicsBackend};
use crate::convert::{quat_to_glam, vec3_to_glam, vec3_to_rapier};
use crate::error::Result;
use crate::terrain_collider::{build_terrain_collider, CollisionMode};

/// Physics simulation world
///
/// Manages all rigid bodies, colliders, and physics simulation state.
/// This is a wrapper around Rapier's physics pipeline.
pub struct PhysicsWorld {
    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,
    pub(crate) impulse_joint_set: ImpulseJointSet,
    pub(crate) multibody_joint_set: MultibodyJointSet,
    pub(crate) integration_parameters: IntegrationParameters,
    pub(crate) physics_pipeline: PhysicsPipeline,
    pub(crate) island_manager: IslandManager,
    pub(crate) broad_phase: DefaultBroadPhase,
    pub(crate) narrow_phase: NarrowPhase,
    pub(crate) ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    terrain_body: Option<RigidBodyHandle>,
}

impl PhysicsWorld {
    /// Create a new physics world with specified gravity
    ///
    /// # Arguments
    /// * `gravity` - Gravity vector (e.g., Vec3::new(0.0, -9.82, 0.0))
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            gravity: vec3_to_rapier(gravity),
            terrain_body: None,
        }
    }

    /// Add a rigid body to the world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Remove a rigid body and all colliders attached to it
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Add a collider to the world, attached to a rigid body
    pub fn add_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Insert the static terrain shape at the world origin
    ///
    /// The collider is built from `volume` with the given mode before
    /// anything is added, so a rejected volume leaves the world untouched.
    /// Calling this again replaces the previous terrain.
    pub fn insert_terrain(
        &mut self,
        volume: &CollisionVolume,
        mode: CollisionMode,
    ) -> Result<ColliderHandle> {
        let collider = build_terrain_collider(volume, mode)?;

        if let Some(previous) = self.terrain_body.take() {
            debug!("Replacing existing terrain body");
            self.remove_rigid_body(previous);
        }

        let body = self.add_rigid_body(RigidBodyBuilder::fixed().build());
        let handle = self.add_collider(collider, body);
        self.terrain_body = Some(body);

        info!(
            faces = volume.faces.len(),
            vertices = volume.vertices.len(),
            mode = ?mode,
            "Terrain collider inserted"
        );
        Ok(handle)
    }

    /// Whether a terrain collider is present
    pub fn has_terrain(&self) -> bool {
        self.terrain_body.is_some()
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Number of rigid bodies, including the terrain body
    pub fn rigid_body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of colliders, including the terrain collider
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Get the current gravity vector
    pub fn gravity(&self) -> Vec3 {
        vec3_to_glam(&self.gravity)
    }
}

impl PhysicsBackend for PhysicsWorld {
    /// Step the physics simulation forward by dt seconds
    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        let body = self.rigid_body_set.get(handle)?;
        Some(BodyState {
            position: vec3_to_glam(body.translation()),
            velocity: vec3_to_glam(body.linvel()),
            orientation: quat_to_glam(body.rotation()),
        })
    }

    fn reset_body(&mut self, handle: RigidBodyHandle, position: Vec3, velocity: Vec3) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };
        body.set_translation(vec3_to_rapier(position), true);
        body.set_linvel(vec3_to_rapier(velocity), true);
        true
    }

    fn attach_terrain(&mut self, volume: &CollisionVolume, mode: CollisionMode) -> Result<()> {
        self.insert_terrain(volume, mode).map(|_| ())
    }
}
