//! Frame loop ordering tests
//!
//! A recording physics backend, renderer and scheduler share one event log,
//! so the order of calls inside and across frames can be asserted directly.

use std::cell::RefCell;
use std::rc::Rc;

use app::terrafall_physics::rapier3d::prelude::RigidBodyHandle;
use app::terrafall_physics::{
    BodyState, CollisionMode, PhysicsBackend, PhysicsError, RespawnTrigger,
};
use app::terrain::{CollisionVolume, HeightmapImage, TerrainError, TerrainMesh};
use app::{
    FrameInfo, FrameLoop, FrameScheduler, NodeId, NodeTransform, SceneConfig, SceneError,
    SceneRenderer,
};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Step,
    Reset(Vec3),
    AttachTerrain(usize),
    UploadTerrain(usize),
    SetTransform(NodeId, Vec3),
    Draw { frame: u64, has_terrain: bool },
    RequestFrame,
}

type Log = Rc<RefCell<Vec<Event>>>;

/// Bodies move with constant velocity; no gravity, no contacts
struct MockPhysics {
    log: Log,
    bodies: Vec<(RigidBodyHandle, BodyState)>,
    reject_terrain: bool,
}

impl MockPhysics {
    fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            bodies: Vec::new(),
            reject_terrain: false,
        }
    }

    fn add_body(&mut self, position: Vec3, velocity: Vec3) -> RigidBodyHandle {
        let handle = RigidBodyHandle::from_raw_parts(self.bodies.len() as u32, 0);
        self.bodies.push((
            handle,
            BodyState {
                position,
                velocity,
                ..Default::default()
            },
        ));
        handle
    }
}

impl PhysicsBackend for MockPhysics {
    fn step(&mut self, dt: f32) {
        for (_, state) in &mut self.bodies {
            state.position += state.velocity * dt;
        }
        self.log.borrow_mut().push(Event::Step);
    }

    fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        self.bodies
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, state)| *state)
    }

    fn reset_body(&mut self, handle: RigidBodyHandle, position: Vec3, velocity: Vec3) -> bool {
        let Some((_, state)) = self.bodies.iter_mut().find(|(h, _)| *h == handle) else {
            return false;
        };
        state.position = position;
        state.velocity = velocity;
        self.log.borrow_mut().push(Event::Reset(position));
        true
    }

    fn attach_terrain(
        &mut self,
        volume: &CollisionVolume,
        _mode: CollisionMode,
    ) -> app::terrafall_physics::Result<()> {
        if self.reject_terrain {
            return Err(PhysicsError::NonConvex {
                vertices: volume.vertices.len(),
            });
        }
        self.log
            .borrow_mut()
            .push(Event::AttachTerrain(volume.faces.len()));
        Ok(())
    }
}

struct MockRenderer {
    log: Log,
}

impl SceneRenderer for MockRenderer {
    fn upload_terrain(&mut self, mesh: &TerrainMesh) {
        self.log
            .borrow_mut()
            .push(Event::UploadTerrain(mesh.triangle_count()));
    }

    fn set_transform(&mut self, node: NodeId, transform: NodeTransform) {
        self.log
            .borrow_mut()
            .push(Event::SetTransform(node, transform.translation));
    }

    fn draw(&mut self, frame: &FrameInfo) {
        self.log.borrow_mut().push(Event::Draw {
            frame: frame.frame,
            has_terrain: frame.has_terrain,
        });
    }
}

struct MockScheduler {
    log: Log,
}

impl FrameScheduler for MockScheduler {
    fn request_next_frame(&mut self) {
        self.log.borrow_mut().push(Event::RequestFrame);
    }
}

struct Harness {
    log: Log,
    frame_loop: FrameLoop<MockPhysics, MockRenderer>,
    scheduler: MockScheduler,
    body: RigidBodyHandle,
}

impl Harness {
    fn new(position: Vec3, velocity: Vec3) -> Self {
        let log: Log = Rc::default();
        let mut physics = MockPhysics::new(&log);
        let body = physics.add_body(position, velocity);

        let mut config = SceneConfig::default();
        config.respawn.seed = Some(11);

        let mut frame_loop = FrameLoop::new(physics, MockRenderer { log: log.clone() }, &config);
        frame_loop.track_body(body, NodeId(0));

        Self {
            scheduler: MockScheduler { log: log.clone() },
            log,
            frame_loop,
            body,
        }
    }

    fn frame(&mut self, timestamp_ms: f64) -> app::FrameReport {
        self.frame_loop.on_frame(timestamp_ms, &mut self.scheduler)
    }

    fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

fn flat_heightmap(size: u32) -> HeightmapImage {
    HeightmapImage::new(size, size, vec![0; (size * size * 4) as usize])
}

#[test]
fn test_step_precedes_sync_every_frame() {
    let mut harness = Harness::new(Vec3::new(5.0, 8.0, 5.0), Vec3::new(0.0, -6.0, 0.0));

    for frame in 0..3u64 {
        harness.frame(frame as f64 * 16.0);
        let events = harness.take_events();

        assert_eq!(events.len(), 4, "Unexpected events: {:?}", events);
        assert_eq!(events[0], Event::Step);
        assert!(matches!(events[1], Event::SetTransform(NodeId(0), _)));
        assert_eq!(
            events[2],
            Event::Draw {
                frame,
                has_terrain: false
            }
        );
        assert_eq!(events[3], Event::RequestFrame);
    }
}

#[test]
fn test_synced_transform_reflects_current_step() {
    let mut harness = Harness::new(Vec3::new(5.0, 8.0, 5.0), Vec3::new(0.0, -6.0, 0.0));
    harness.frame(0.0);

    let events = harness.take_events();
    let Event::SetTransform(_, translation) = events[1] else {
        panic!("Expected a transform, got {:?}", events[1]);
    };
    // One 1/60 s tick at -6 m/s
    assert!((translation.y - 7.9).abs() < 1e-5);
    assert_eq!(
        Some(translation),
        harness
            .frame_loop
            .context()
            .physics
            .body_state(harness.body)
            .map(|s| s.position)
    );
}

#[test]
fn test_frames_render_before_heightmap_arrives() {
    let mut harness = Harness::new(Vec3::new(5.0, 8.0, 5.0), Vec3::ZERO);

    harness.frame(0.0);
    harness.frame(16.0);
    let before = harness.take_events();
    assert!(before
        .iter()
        .all(|e| !matches!(e, Event::UploadTerrain(_) | Event::AttachTerrain(_))));
    assert_eq!(
        before
            .iter()
            .filter(|e| matches!(e, Event::Draw { has_terrain: false, .. }))
            .count(),
        2
    );

    harness
        .frame_loop
        .on_heightmap_decoded(Ok(flat_heightmap(4)))
        .unwrap();
    // 3x3 quads, two triangles each; collider before mesh
    assert_eq!(
        harness.take_events(),
        vec![Event::AttachTerrain(18), Event::UploadTerrain(18)]
    );

    let report = harness.frame(32.0);
    assert!(report.has_terrain);
    assert!(harness.take_events().contains(&Event::Draw {
        frame: 2,
        has_terrain: true
    }));
}

#[test]
fn test_decode_failure_keeps_scene_running() {
    let mut harness = Harness::new(Vec3::new(5.0, 8.0, 5.0), Vec3::ZERO);

    let failure = TerrainError::InvalidDimensions {
        width: 0,
        height: 0,
    };
    let result = harness.frame_loop.on_heightmap_decoded(Err(failure));
    assert!(matches!(result, Err(SceneError::Terrain(_))));
    assert!(harness.take_events().is_empty());

    let report = harness.frame(0.0);
    assert!(!report.has_terrain);
    assert_eq!(harness.take_events().last(), Some(&Event::RequestFrame));
}

#[test]
fn test_short_pixel_buffer_is_rejected_before_physics() {
    let mut harness = Harness::new(Vec3::ZERO, Vec3::ZERO);

    let truncated = HeightmapImage::new(4, 4, vec![0; 63]);
    let result = harness.frame_loop.on_heightmap_decoded(Ok(truncated));

    assert!(matches!(
        result,
        Err(SceneError::Terrain(TerrainError::OutOfRange { needed: 64, len: 63 }))
    ));
    assert!(harness.take_events().is_empty());
    assert!(!harness.frame_loop.has_terrain());
}

#[test]
fn test_physics_rejection_skips_upload() {
    let mut harness = Harness::new(Vec3::ZERO, Vec3::ZERO);
    harness.frame_loop.context_mut().physics.reject_terrain = true;

    let result = harness
        .frame_loop
        .on_heightmap_decoded(Ok(flat_heightmap(4)));

    assert!(matches!(
        result,
        Err(SceneError::Physics(PhysicsError::NonConvex { vertices: 16 }))
    ));
    assert!(harness.take_events().is_empty());
    assert!(!harness.frame_loop.has_terrain());
}

#[test]
fn test_respawn_happens_between_step_and_sync() {
    let mut harness = Harness::new(Vec3::new(5.0, -4.95, 5.0), Vec3::new(0.0, -6.0, 0.0));

    let report = harness.frame(0.0);
    assert_eq!(report.respawns, vec![(NodeId(0), RespawnTrigger::BelowFloor)]);

    let events = harness.take_events();
    assert_eq!(events[0], Event::Step);
    let Event::Reset(spawn) = events[1] else {
        panic!("Expected a reset, got {:?}", events[1]);
    };
    assert_eq!(spawn.y, 10.0);
    assert!((0.0..32.0).contains(&spawn.x));
    assert!((0.0..32.0).contains(&spawn.z));
    // The renderer sees the relocated body in the same frame
    assert_eq!(events[2], Event::SetTransform(NodeId(0), spawn));

    let state = harness
        .frame_loop
        .context()
        .physics
        .body_state(harness.body)
        .unwrap();
    assert_eq!(state.velocity, Vec3::ZERO);
}

#[test]
fn test_settled_body_is_respawned() {
    // Tiny upward drift: the resting signature
    let mut harness = Harness::new(Vec3::new(5.0, 1.0, 5.0), Vec3::new(0.0, 0.005, 0.0));

    let report = harness.frame(0.0);
    assert_eq!(report.respawns, vec![(NodeId(0), RespawnTrigger::AtRest)]);
    assert_eq!(
        harness.frame_loop.tracked()[0].state,
        app::terrafall_physics::RespawnState::Grounded(RespawnTrigger::AtRest)
    );

    // Zero velocity after the reset is not "at rest" (needs vy > 0)
    let report = harness.frame(16.0);
    assert!(report.respawns.is_empty());
    assert_eq!(
        harness.frame_loop.tracked()[0].state,
        app::terrafall_physics::RespawnState::InFlight
    );
}

#[test]
fn test_terrain_upload_precedes_later_frames_only() {
    let mut harness = Harness::new(Vec3::new(5.0, 8.0, 5.0), Vec3::ZERO);
    harness
        .frame_loop
        .on_heightmap_decoded(Ok(flat_heightmap(3)))
        .unwrap();
    harness.take_events();

    // A second decode result is ignored entirely
    harness
        .frame_loop
        .on_heightmap_decoded(Ok(flat_heightmap(5)))
        .unwrap();
    assert!(harness.take_events().is_empty());
}
