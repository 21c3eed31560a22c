mod backend;
mod body;
pub mod convert;
mod error;
mod respawn;
mod terrain_collider;
mod world;

pub use backend::{BodyState, PhysicsBackend};
pub use body::{SphereBody, SphereBodyConfig};
pub use error::{PhysicsError, Result};
pub use respawn::{RespawnPolicy, RespawnState, RespawnTrigger, RespawnZone, SpawnBounds};
pub use terrain_collider::{build_terrain_collider, CollisionMode, HULL_TOLERANCE};
pub use world::PhysicsWorld;

// Re-export for convenience
pub use glam;
pub use rapier3d;
