//! Heightmap Terrain Testbed
//!
//! Drops spheres onto a heightmap terrain without opening a window and
//! reports how often they were respawned.
//!
//! Scene configuration is loaded from a TOML file. Use `--config <path>`
//! to specify one; `RUST_LOG=debug` shows individual respawns.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use app::{load_config, SceneConfig};
use clap::Parser;
use testbed::{run_headless, HeightmapSource, RunOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "crates/apps/testbed/config/scene.toml";

/// Heightmap Terrain Testbed
#[derive(Parser, Debug)]
#[command(name = "testbed")]
#[command(about = "Headless falling-sphere scene on heightmap terrain")]
struct Args {
    /// Load scene configuration from a TOML file
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, short = 'f', default_value_t = 600)]
    frames: u64,

    /// Simulated display refresh rate
    #[arg(long, value_name = "HZ", default_value_t = 60.0)]
    refresh_hz: f64,

    /// Heightmap image (overrides the config file)
    #[arg(long, value_name = "PATH", conflicts_with = "synthetic")]
    heightmap: Option<PathBuf>,

    /// Generate a SIZE x SIZE heightmap instead of loading one
    #[arg(long, value_name = "SIZE")]
    synthetic: Option<u32>,

    /// Frames to run before the heightmap becomes available
    #[arg(long, value_name = "FRAMES", default_value_t = 0)]
    decode_delay: u64,

    /// Seed for respawn positions (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Some(path) = &args.heightmap {
        if !path.is_file() {
            bail!("Heightmap not found: {}", path.display());
        }
    }

    let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = load_or_default(&config_path);
    if args.seed.is_some() {
        config.respawn.seed = args.seed;
    }

    let source = match (&args.heightmap, args.synthetic, &config.terrain.heightmap) {
        (Some(path), _, _) => Some(HeightmapSource::File(path.clone())),
        (None, Some(size), _) => Some(HeightmapSource::Synthetic(size)),
        (None, None, Some(path)) => Some(HeightmapSource::File(path.clone())),
        (None, None, None) => None,
    };

    let options = RunOptions {
        frames: args.frames,
        refresh_hz: args.refresh_hz,
        decode_delay: args.decode_delay,
    };

    info!(source = ?source, frames = options.frames, "Starting testbed");
    let summary = run_headless(&config, source.as_ref(), &options);

    if let Some(err) = &summary.terrain_error {
        warn!(error = %err, "Ran without terrain");
    }
    for (node, position) in &summary.final_positions {
        info!(node = node.0, x = position.x, y = position.y, z = position.z, "Final position");
    }

    Ok(())
}

/// Load the scene config, falling back to defaults if it is missing or invalid
fn load_or_default(path: &Path) -> SceneConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Using default scene configuration");
            SceneConfig::default()
        }
    }
}
