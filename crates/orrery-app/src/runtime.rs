//! Wires config into a live planet: dispatcher, deletion queue, and terrain.

use std::sync::Arc;

use glam::DVec3;
use orrery_config::Config;
use orrery_lod::{
    LodParams, LodParamsError, PatchContext, PatchStats, SphericalTerrain, TerrainPatchData,
};
use orrery_mesh::{MeshDeletionQueue, ThreadedTerrainDispatcher};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid LOD settings: {0}")]
    Lod(#[from] LodParamsError),

    #[error("planet radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}

/// What one frame did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub stats: PatchStats,
    /// Meshes selected for drawing.
    pub drawn: usize,
    /// Released meshes freed this frame.
    pub freed: usize,
    /// Mesh requests still queued or running.
    pub in_flight: usize,
}

/// A planet and the resources its terrain needs.
///
/// Stands in for the render side: each frame it selects meshes to draw and
/// frees the ones patches have released.
pub struct PlanetRuntime {
    terrain: SphericalTerrain,
    dispatcher: Arc<ThreadedTerrainDispatcher>,
    deletions: MeshDeletionQueue,
    freed_total: usize,
}

impl PlanetRuntime {
    pub fn from_config(config: &Config) -> Result<Self, RuntimeError> {
        let radius = config.planet.radius;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(RuntimeError::InvalidRadius(radius));
        }
        let params = LodParams::new(
            config.lod.dist_min,
            config.lod.dist_max,
            config.lod.min_size,
            config.lod.max_lod,
        )?;

        let resolution = config.generation.mesh_resolution;
        let dispatcher = Arc::new(match config.generation.worker_threads {
            0 => ThreadedTerrainDispatcher::with_defaults(resolution),
            n => ThreadedTerrainDispatcher::new(n, resolution),
        });

        let patch_row = config.planet.patch_row.max(1);
        let deletions = MeshDeletionQueue::new();
        let context = Arc::new(PatchContext {
            terrain: TerrainPatchData {
                radius,
                patch_width: 2.0 * radius / f64::from(patch_row),
            },
            params,
            dispatcher: dispatcher.clone(),
            releaser: deletions.releaser(),
        });
        let terrain = SphericalTerrain::new(context, patch_row, config.planet.unload_distance);
        info!(
            radius,
            patch_row,
            workers = dispatcher.worker_count(),
            "planet runtime ready"
        );

        Ok(Self {
            terrain,
            dispatcher,
            deletions,
            freed_total: 0,
        })
    }

    pub fn terrain(&self) -> &SphericalTerrain {
        &self.terrain
    }

    /// Total meshes freed since startup.
    pub fn freed_total(&self) -> usize {
        self.freed_total
    }

    /// Run one frame with the camera at `camera_pos`, relative to the planet centre.
    pub fn frame(&mut self, camera_pos: DVec3) -> FrameReport {
        self.terrain.update(camera_pos);
        let drawn = self.terrain.collect_render_meshes().len();
        // Dropping the drained handles frees them once the producer lets go too.
        let freed = self.deletions.drain().len();
        self.freed_total += freed;

        FrameReport {
            stats: self.terrain.stats(),
            drawn,
            freed,
            in_flight: self.dispatcher.in_flight_count(),
        }
    }
}
