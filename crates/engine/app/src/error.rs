//! Error types for scene setup and configuration

use std::path::PathBuf;

use terrafall_physics::PhysicsError;
use terrain::TerrainError;
use thiserror::Error;

/// Errors loading a scene configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for a scene
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors building the scene's terrain
#[derive(Error, Debug)]
pub enum SceneError {
    /// Heightmap could not be decoded, sampled or meshed
    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    /// Physics engine rejected the collision volume
    #[error("Physics configuration error: {0}")]
    Physics(#[from] PhysicsError),
}
