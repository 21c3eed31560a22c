//! Frame loop for heightmap terrain scenes
//!
//! Each displayed frame runs, strictly in order:
//!
//! 1. [`SimulationClock::step`] - integrate physics
//! 2. [`RespawnPolicy::evaluate`](terrafall_physics::RespawnPolicy::evaluate) - reset lost or settled bodies
//! 3. [`StateSynchronizer::sync`] - copy body poses to visual nodes
//! 4. [`SceneRenderer::draw`]
//!
//! and then asks the host's [`FrameScheduler`] for the next frame. Terrain
//! arrives out of band through [`FrameLoop::on_heightmap_decoded`]; frames
//! before that run without terrain.

pub mod clock;
pub mod config;
mod error;
pub mod frame_loop;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod sync;

pub use clock::{SimulationClock, StepPolicy};
pub use config::{load_config, PhysicsConfig, RespawnConfig, SceneConfig, TerrainConfig};
pub use error::{ConfigError, SceneError};
pub use frame_loop::{FrameLoop, FrameReport, SceneContext, TrackedBody};
pub use render::{FrameInfo, NodeId, NodeTransform, SceneRenderer};
pub use scene::TerrainAssets;
pub use scheduler::FrameScheduler;
pub use sync::{BodyLink, StateSynchronizer};

// Re-export for convenience
pub use terrafall_physics;
pub use terrain;
