//! Respawn policy for bodies that leave the playable terrain
//!
//! Each tracked body is either `InFlight` or has just met a reset condition.
//! Two independent predicates can trigger a reset:
//!
//! - **below floor**: `position.y < floor_threshold`
//! - **at rest**: every velocity component is within `rest_velocity_threshold`
//!   of zero and `velocity.y` is strictly positive (the small upward bounce a
//!   body shows once it has settled on the terrain)
//!
//! A reset teleports the body to a random point over the spawn bounds at
//! `spawn_height` and zeroes its linear velocity. The body is back in flight
//! on the next evaluation; no state is terminal. A body the backend refuses
//! to reset stays `InFlight`.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapier3d::prelude::RigidBodyHandle;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backend::{BodyState, PhysicsBackend};

/// Horizontal rectangle respawned bodies are dropped into
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 32.0,
            z_min: 0.0,
            z_max: 32.0,
        }
    }
}

/// Thresholds and spawn area for the respawn policy
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RespawnZone {
    /// Bodies below this height are considered lost
    pub floor_threshold: f32,
    /// Per-axis speed below which a body counts as resting
    pub rest_velocity_threshold: f32,
    pub spawn_bounds: SpawnBounds,
    pub spawn_height: f32,
}

impl Default for RespawnZone {
    fn default() -> Self {
        Self {
            floor_threshold: -5.0,
            rest_velocity_threshold: 0.01,
            spawn_bounds: SpawnBounds::default(),
            spawn_height: 10.0,
        }
    }
}

impl RespawnZone {
    /// Body has fallen out of the playable volume
    #[inline]
    pub fn is_below_floor(&self, state: &BodyState) -> bool {
        state.position.y < self.floor_threshold
    }

    /// Body has nearly stopped while still rising slightly
    pub fn is_at_rest(&self, state: &BodyState) -> bool {
        let v = state.velocity;
        let t = self.rest_velocity_threshold;
        v.y.abs() < t && v.y > 0.0 && v.x.abs() < t && v.z.abs() < t
    }

    /// Which reset condition `state` meets, floor first
    pub fn trigger(&self, state: &BodyState) -> Option<RespawnTrigger> {
        if self.is_below_floor(state) {
            Some(RespawnTrigger::BelowFloor)
        } else if self.is_at_rest(state) {
            Some(RespawnTrigger::AtRest)
        } else {
            None
        }
    }
}

/// Why a body was reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnTrigger {
    BelowFloor,
    AtRest,
}

/// Outcome of evaluating one body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnState {
    /// Falling or moving freely; left alone
    InFlight,
    /// Met a reset condition and was relocated this tick
    Grounded(RespawnTrigger),
}

/// Detects lost or settled bodies and drops them back over the terrain
#[derive(Debug, Clone)]
pub struct RespawnPolicy {
    zone: RespawnZone,
    rng: StdRng,
}

impl RespawnPolicy {
    /// Create a policy; `seed` makes spawn points reproducible
    pub fn new(zone: RespawnZone, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { zone, rng }
    }

    pub fn zone(&self) -> &RespawnZone {
        &self.zone
    }

    /// Draw a spawn point uniformly over the spawn bounds at spawn height
    pub fn spawn_point(&mut self) -> Vec3 {
        let bounds = self.zone.spawn_bounds;
        let x = uniform(&mut self.rng, bounds.x_min, bounds.x_max);
        let z = uniform(&mut self.rng, bounds.z_min, bounds.z_max);
        Vec3::new(x, self.zone.spawn_height, z)
    }

    /// Evaluate one body and reset it if a trigger fires
    ///
    /// Unknown handles are treated as in flight.
    pub fn evaluate<P>(&mut self, physics: &mut P, handle: RigidBodyHandle) -> RespawnState
    where
        P: PhysicsBackend + ?Sized,
    {
        let Some(state) = physics.body_state(handle) else {
            return RespawnState::InFlight;
        };
        let Some(trigger) = self.zone.trigger(&state) else {
            return RespawnState::InFlight;
        };

        let spawn = self.spawn_point();
        if !physics.reset_body(handle, spawn, Vec3::ZERO) {
            warn!(?trigger, ?handle, "Body could not be reset, leaving it in flight");
            return RespawnState::InFlight;
        }
        debug!(
            ?trigger,
            from = ?state.position,
            to = ?spawn,
            "Respawned body"
        );
        RespawnState::Grounded(trigger)
    }
}

/// Uniform sample in `[min, max)`, or `min` for an empty range
fn uniform(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
