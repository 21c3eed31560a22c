//! Per-frame driver
//!
//! [`FrameLoop`] owns the scene context and is driven entirely by host
//! callbacks: [`FrameLoop::on_frame`] for every display frame and
//! [`FrameLoop::on_heightmap_decoded`] once the heightmap image is ready.
//! Nothing runs between callbacks, so there is no shared mutable state to
//! guard.

use glam::Vec3;
use terrafall_physics::rapier3d::prelude::RigidBodyHandle;
use terrafall_physics::{
    PhysicsBackend, PhysicsWorld, RespawnPolicy, RespawnState, RespawnTrigger, SphereBody,
};
use terrain::HeightmapImage;
use tracing::{debug, error, info, warn};

use crate::clock::SimulationClock;
use crate::config::{SceneConfig, TerrainConfig};
use crate::error::SceneError;
use crate::render::{FrameInfo, NodeId, SceneRenderer};
use crate::scene::TerrainAssets;
use crate::scheduler::FrameScheduler;
use crate::sync::StateSynchronizer;

/// Everything one running scene owns
pub struct SceneContext<P, R> {
    pub physics: P,
    pub renderer: R,
    pub clock: SimulationClock,
    pub respawn: RespawnPolicy,
    pub synchronizer: StateSynchronizer,
    /// Present once the heightmap has been decoded and built
    pub terrain: Option<TerrainAssets>,
}

/// A body under respawn supervision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedBody {
    pub body: RigidBodyHandle,
    pub node: NodeId,
    /// Outcome of the latest respawn evaluation
    pub state: RespawnState,
}

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Physics ticks run
    pub ticks: u32,
    /// Bodies reset this frame and why
    pub respawns: Vec<(NodeId, RespawnTrigger)>,
    /// Transforms pushed to the renderer
    pub synced: usize,
    pub has_terrain: bool,
}

/// Drives simulation, respawn, synchronization and drawing, in that order
pub struct FrameLoop<P, R> {
    context: SceneContext<P, R>,
    terrain_config: TerrainConfig,
    tracked: Vec<TrackedBody>,
    frame: u64,
}

impl<P: PhysicsBackend, R: SceneRenderer> FrameLoop<P, R> {
    /// Wrap a physics backend and renderer using the scene's settings
    ///
    /// No bodies are tracked yet; see [`FrameLoop::track_body`].
    pub fn new(physics: P, renderer: R, config: &SceneConfig) -> Self {
        let context = SceneContext {
            physics,
            renderer,
            clock: SimulationClock::new(config.physics.step_policy, config.physics.timestep),
            respawn: RespawnPolicy::new(config.respawn.zone, config.respawn.seed),
            synchronizer: StateSynchronizer::new(),
            terrain: None,
        };

        Self {
            context,
            terrain_config: config.terrain.clone(),
            tracked: Vec::new(),
            frame: 0,
        }
    }

    /// Supervise `body` and display it through `node`
    pub fn track_body(&mut self, body: RigidBodyHandle, node: NodeId) {
        self.context.synchronizer.link(body, node);
        self.tracked.retain(|tracked| tracked.node != node);
        self.tracked.push(TrackedBody {
            body,
            node,
            state: RespawnState::InFlight,
        });
    }

    pub fn tracked(&self) -> &[TrackedBody] {
        &self.tracked
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn has_terrain(&self) -> bool {
        self.context.terrain.is_some()
    }

    pub fn context(&self) -> &SceneContext<P, R> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext<P, R> {
        &mut self.context
    }

    /// Heightmap decode finished
    ///
    /// On success the terrain is built, its collider handed to physics and
    /// its mesh uploaded to the renderer. Terrain is built at most once;
    /// later calls are ignored.
    ///
    /// On failure the scene keeps running without terrain and the error is
    /// returned for the host to report.
    pub fn on_heightmap_decoded(
        &mut self,
        decoded: terrain::Result<HeightmapImage>,
    ) -> Result<(), SceneError> {
        if self.context.terrain.is_some() {
            warn!("Terrain already built, ignoring heightmap");
            return Ok(());
        }

        let result = decoded
            .map_err(SceneError::from)
            .and_then(|image| self.install_terrain(&image));

        if let Err(err) = &result {
            error!(error = %err, "Terrain unavailable, continuing without it");
        }
        result
    }

    fn install_terrain(&mut self, image: &HeightmapImage) -> Result<(), SceneError> {
        let assets = TerrainAssets::build(image, &self.terrain_config)?;

        // Physics first: a rejected volume must not leave a rendered
        // surface that nothing collides with
        self.context
            .physics
            .attach_terrain(&assets.volume, self.terrain_config.collision)?;
        self.context.renderer.upload_terrain(&assets.mesh);

        info!(frame = self.frame, "Terrain installed");
        self.context.terrain = Some(assets);
        Ok(())
    }

    /// Run one display frame and request the next
    pub fn on_frame<S>(&mut self, timestamp_ms: f64, scheduler: &mut S) -> FrameReport
    where
        S: FrameScheduler + ?Sized,
    {
        let ctx = &mut self.context;

        let ticks = ctx.clock.step(&mut ctx.physics, timestamp_ms);

        let mut respawns = Vec::new();
        for tracked in &mut self.tracked {
            tracked.state = ctx.respawn.evaluate(&mut ctx.physics, tracked.body);
            if let RespawnState::Grounded(trigger) = tracked.state {
                respawns.push((tracked.node, trigger));
            }
        }

        let synced = ctx.synchronizer.sync(&ctx.physics, &mut ctx.renderer);

        let has_terrain = ctx.terrain.is_some();
        ctx.renderer.draw(&FrameInfo {
            frame: self.frame,
            timestamp_ms,
            ticks,
            has_terrain,
        });

        scheduler.request_next_frame();

        if !respawns.is_empty() {
            debug!(frame = self.frame, count = respawns.len(), "Bodies respawned");
        }

        let report = FrameReport {
            frame: self.frame,
            ticks,
            respawns,
            synced,
            has_terrain,
        };
        self.frame += 1;
        report
    }
}

impl<R: SceneRenderer> FrameLoop<PhysicsWorld, R> {
    /// Build a Rapier-backed scene with every configured sphere tracked
    ///
    /// Sphere `i` in `config.bodies` is displayed through `NodeId(i)`.
    pub fn from_config(config: &SceneConfig, renderer: R) -> Self {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, config.physics.gravity, 0.0));
        let spheres: Vec<SphereBody> = config
            .bodies
            .iter()
            .map(|body| SphereBody::spawn(&mut world, body))
            .collect();

        let mut frame_loop = Self::new(world, renderer, config);
        for (index, sphere) in spheres.iter().enumerate() {
            frame_loop.track_body(sphere.body_handle(), NodeId(index as u32));
        }

        info!(
            bodies = spheres.len(),
            timestep = config.physics.timestep,
            policy = ?config.physics.step_policy,
            "Scene ready"
        );
        frame_loop
    }
}
