//! The binary entry point: a headless orbit around a planet.

use clap::Parser;
use orrery_app::{FIXED_DT, OrbitCamera, PlanetRuntime, PlatformDirs};
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve().and_then(|d| d.create_dirs().map(|()| d)) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            std::process::exit(1);
        }
    };
    let config_dir = args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    let mut runtime = match PlanetRuntime::from_config(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let camera = OrbitCamera::new(
        config.planet.radius,
        config.camera.orbit_altitude,
        config.camera.orbit_speed,
    );
    let interval = config.debug.stats_interval;

    for frame in 0..config.camera.frames {
        let report = runtime.frame(camera.position(f64::from(frame) * FIXED_DT));
        if interval > 0 && frame % interval == 0 {
            info!(
                frame,
                patches = report.stats.patches,
                leaves = report.stats.leaves,
                max_lod = report.stats.max_lod,
                drawn = report.drawn,
                pending = report.stats.pending_meshes,
                in_flight = report.in_flight,
                "terrain frame"
            );
        }
    }

    let stats = runtime.terrain().stats();
    info!(
        frames = config.camera.frames,
        patches = stats.patches,
        freed = runtime.freed_total(),
        "orbit finished"
    );
}
