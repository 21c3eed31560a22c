use std::path::{Path, PathBuf};

use serde::Deserialize;
use terrafall_physics::{CollisionMode, RespawnZone, SphereBodyConfig};
use terrain::{SamplingStrategy, Winding};
use tracing::info;

use crate::clock::StepPolicy;
use crate::error::ConfigError;

/// Scene configuration loaded from a TOML file
///
/// Every section is optional; missing sections and fields take the
/// defaults of the classic falling-sphere scene.
#[derive(Debug, Deserialize, Clone)]
pub struct SceneConfig {
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub respawn: RespawnConfig,
    #[serde(default = "default_bodies")]
    pub bodies: Vec<SphereBodyConfig>,
}

fn default_bodies() -> Vec<SphereBodyConfig> {
    vec![SphereBodyConfig::default()]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            physics: PhysicsConfig::default(),
            respawn: RespawnConfig::default(),
            bodies: default_bodies(),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TerrainConfig {
    /// Heightmap image; relative paths resolve against the config file
    pub heightmap: Option<PathBuf>,
    pub sampling: SamplingStrategy,
    pub winding: Winding,
    pub collision: CollisionMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhysicsConfig {
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Seconds per physics tick
    #[serde(default = "default_timestep")]
    pub timestep: f32,
    #[serde(default)]
    pub step_policy: StepPolicy,
}

fn default_gravity() -> f32 {
    -9.82
}

fn default_timestep() -> f32 {
    1.0 / 60.0
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            timestep: default_timestep(),
            step_policy: StepPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RespawnConfig {
    #[serde(flatten)]
    pub zone: RespawnZone,
    /// Fixed seed for spawn points (omit for a random seed)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Load a scene configuration file
///
/// A relative `terrain.heightmap` is rewritten relative to the directory
/// containing `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = SceneConfig::from_toml_str(&text)?;

    if let (Some(heightmap), Some(dir)) = (config.terrain.heightmap.as_mut(), path.parent()) {
        if heightmap.is_relative() {
            *heightmap = dir.join(&*heightmap);
        }
    }

    info!(path = %path.display(), bodies = config.bodies.len(), "Loaded scene config");
    Ok(config)
}
