//! Headless terrain testbed
//!
//! Runs a scene without a window: the renderer records what it is handed
//! and the scheduler stands in for the display's refresh callback.

use std::collections::BTreeMap;
use std::path::PathBuf;

use app::terrafall_physics::RespawnTrigger;
use app::{FrameInfo, FrameLoop, FrameScheduler, NodeId, NodeTransform, SceneConfig, SceneRenderer};
use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};
use terrain::{HeightmapImage, TerrainMesh};
use tracing::{info, trace, warn};

/// Renderer that keeps the latest state instead of drawing it
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    terrain_triangles: Option<usize>,
    transforms: BTreeMap<NodeId, NodeTransform>,
    frames_drawn: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangle count of the uploaded terrain, if any
    pub fn terrain_triangles(&self) -> Option<usize> {
        self.terrain_triangles
    }

    pub fn transform(&self, node: NodeId) -> Option<NodeTransform> {
        self.transforms.get(&node).copied()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn upload_terrain(&mut self, mesh: &TerrainMesh) {
        self.terrain_triangles = Some(mesh.triangle_count());
    }

    fn set_transform(&mut self, node: NodeId, transform: NodeTransform) {
        self.transforms.insert(node, transform);
    }

    fn draw(&mut self, frame: &FrameInfo) {
        self.frames_drawn += 1;
        for (node, transform) in &self.transforms {
            trace!(
                frame = frame.frame,
                node = node.0,
                position = ?transform.translation,
                "Node"
            );
        }
    }
}

/// Fixed-rate stand-in for a display refresh callback
///
/// A frame only runs if the previous one asked for it.
#[derive(Debug)]
pub struct HeadlessScheduler {
    frame_interval_ms: f64,
    next_timestamp_ms: f64,
    pending: bool,
    requests: u64,
}

impl HeadlessScheduler {
    pub fn new(refresh_hz: f64) -> Self {
        Self {
            frame_interval_ms: 1000.0 / refresh_hz.max(1.0),
            next_timestamp_ms: 0.0,
            // The host schedules the very first frame itself
            pending: true,
            requests: 0,
        }
    }

    /// Timestamp for the next frame, if one was requested
    pub fn next_frame(&mut self) -> Option<f64> {
        if !std::mem::take(&mut self.pending) {
            return None;
        }
        let timestamp = self.next_timestamp_ms;
        self.next_timestamp_ms += self.frame_interval_ms;
        Some(timestamp)
    }

    /// Requests received from the frame loop
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request_next_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}

/// Where the terrain heightmap comes from
#[derive(Debug, Clone, PartialEq)]
pub enum HeightmapSource {
    File(PathBuf),
    /// Generated rolling hills of the given edge length
    Synthetic(u32),
}

impl HeightmapSource {
    pub fn decode(&self) -> terrain::Result<HeightmapImage> {
        match self {
            HeightmapSource::File(path) => HeightmapImage::open(path),
            HeightmapSource::Synthetic(size) => Ok(synthetic_heightmap(*size)),
        }
    }
}

/// Greyscale hills sloping down from the centre
pub fn synthetic_heightmap(size: u32) -> HeightmapImage {
    let center = size.saturating_sub(1) as f32 / 2.0;
    let image = RgbaImage::from_fn(size, size, |x, z| {
        let (fx, fz) = (x as f32, z as f32);
        let falloff = Vec2::new(fx - center, fz - center).length() / center.max(1.0);
        let height = 0.55 + 0.2 * (fx * 0.4).sin() * (fz * 0.3).cos() - 0.35 * falloff;
        let level = (height.clamp(0.0, 1.0) * 255.0) as u8;
        Rgba([level, level, level, 255])
    });
    HeightmapImage::from_rgba(image)
}

/// How long and how fast to run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u64,
    pub refresh_hz: f64,
    /// Frames to run before the heightmap "finishes decoding"
    pub decode_delay: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            refresh_hz: 60.0,
            decode_delay: 0,
        }
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub below_floor_respawns: u64,
    pub at_rest_respawns: u64,
    pub terrain_triangles: Option<usize>,
    /// Why terrain is missing, if it failed to build
    pub terrain_error: Option<String>,
    pub final_positions: Vec<(NodeId, Vec3)>,
}

/// Run a scene for `options.frames` frames
///
/// The heightmap is decoded up front and delivered after
/// `options.decode_delay` frames, the way an asynchronous image load lands
/// between two display frames.
pub fn run_headless(
    config: &SceneConfig,
    source: Option<&HeightmapSource>,
    options: &RunOptions,
) -> RunSummary {
    let mut frame_loop = FrameLoop::from_config(config, HeadlessRenderer::new());
    let mut scheduler = HeadlessScheduler::new(options.refresh_hz);
    let mut summary = RunSummary::default();

    let mut pending_decode = source.map(HeightmapSource::decode);
    if pending_decode.is_none() {
        warn!("No heightmap configured, running without terrain");
    }

    while summary.frames < options.frames {
        if summary.frames == options.decode_delay {
            if let Some(decoded) = pending_decode.take() {
                if let Err(err) = frame_loop.on_heightmap_decoded(decoded) {
                    summary.terrain_error = Some(err.to_string());
                }
            }
        }

        let Some(timestamp_ms) = scheduler.next_frame() else {
            break;
        };
        let report = frame_loop.on_frame(timestamp_ms, &mut scheduler);

        summary.frames += 1;
        summary.ticks += u64::from(report.ticks);
        for (_, trigger) in &report.respawns {
            match trigger {
                RespawnTrigger::BelowFloor => summary.below_floor_respawns += 1,
                RespawnTrigger::AtRest => summary.at_rest_respawns += 1,
            }
        }
    }

    let renderer = &frame_loop.context().renderer;
    summary.terrain_triangles = renderer.terrain_triangles();
    summary.final_positions = frame_loop
        .tracked()
        .iter()
        .filter_map(|tracked| {
            renderer
                .transform(tracked.node)
                .map(|transform| (tracked.node, transform.translation))
        })
        .collect();

    info!(
        frames = summary.frames,
        ticks = summary.ticks,
        below_floor = summary.below_floor_respawns,
        at_rest = summary.at_rest_respawns,
        drawn = renderer.frames_drawn(),
        "Run complete"
    );
    summary
}
