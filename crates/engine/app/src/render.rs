//! Boundary between the frame loop and whatever draws the scene

use glam::{Quat, Vec3};
use terrafall_physics::BodyState;
use terrain::TerrainMesh;

/// Identifies a visual node in the renderer's scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Pose applied to a visual node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl NodeTransform {
    /// Take position and orientation from a physics body; velocity is dropped
    pub fn from_body_state(state: &BodyState) -> Self {
        Self {
            translation: state.position,
            rotation: state.orientation,
        }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Per-frame information handed to [`SceneRenderer::draw`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame counter
    pub frame: u64,
    /// Host timestamp in milliseconds
    pub timestamp_ms: f64,
    /// Physics ticks run this frame
    pub ticks: u32,
    /// Whether terrain has been uploaded yet
    pub has_terrain: bool,
}

/// Rendering back-end driven by the frame loop
///
/// The loop never reads anything back from the renderer. Terrain is
/// uploaded once; body transforms are pushed every frame before `draw`.
pub trait SceneRenderer {
    /// Receive the terrain surface
    fn upload_terrain(&mut self, mesh: &TerrainMesh);

    /// Place a visual node
    fn set_transform(&mut self, node: NodeId, transform: NodeTransform);

    /// Present the frame
    fn draw(&mut self, frame: &FrameInfo);
}
