//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments. CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Planet terrain LOD driver")]
pub struct CliArgs {
    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Maximum subdivision depth.
    #[arg(long)]
    pub max_lod: Option<u32>,

    /// Mesh generation worker threads (0 = auto).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Camera altitude above the surface.
    #[arg(long)]
    pub altitude: Option<f64>,

    /// Frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.radius {
            self.planet.radius = r;
        }
        if let Some(lod) = args.max_lod {
            self.lod.max_lod = lod;
        }
        if let Some(w) = args.workers {
            self.generation.worker_threads = w;
        }
        if let Some(alt) = args.altitude {
            self.camera.orbit_altitude = alt;
        }
        if let Some(frames) = args.frames {
            self.camera.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
