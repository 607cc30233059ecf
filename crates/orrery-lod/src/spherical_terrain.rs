//! Root patches for all six cube faces of one planet.

use std::sync::Arc;

use glam::{DVec2, DVec3};
use orrery_cubesphere::CubeFace;
use orrery_mesh::MeshHandle;
use tracing::info;

use crate::{PatchContext, PatchStats, TerrainPatch};

/// Owns the `patch_row × patch_row` root patches of each face and drives them
/// once per frame.
///
/// When the camera moves farther than `unload_distance` from the planet
/// centre every patch is destroyed; they are rebuilt when it returns.
pub struct SphericalTerrain {
    context: Arc<PatchContext>,
    patch_row: u32,
    unload_distance: f64,
    patches: Vec<TerrainPatch>,
}

impl SphericalTerrain {
    /// Create the terrain; root patches are built on the first in-range update.
    ///
    /// `context.terrain.patch_width` should equal `2 * radius / patch_row`.
    pub fn new(context: Arc<PatchContext>, patch_row: u32, unload_distance: f64) -> Self {
        Self {
            context,
            patch_row: patch_row.max(1),
            unload_distance,
            patches: Vec::new(),
        }
    }

    pub fn patch_row(&self) -> u32 {
        self.patch_row
    }

    /// Root patches, grouped by face in [`CubeFace::ALL`] order.
    pub fn root_patches(&self) -> &[TerrainPatch] {
        &self.patches
    }

    pub fn is_loaded(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Update every patch for this frame. `camera_pos` is relative to the planet centre.
    pub fn update(&mut self, camera_pos: DVec3) {
        if camera_pos.length() > self.unload_distance {
            if self.is_loaded() {
                info!(
                    distance = camera_pos.length(),
                    "camera out of range, unloading terrain patches"
                );
                self.patches.clear();
            }
            return;
        }

        if !self.is_loaded() {
            self.init_patches();
        }
        for patch in &mut self.patches {
            patch.update(camera_pos);
        }
    }

    /// True when every root patch can be drawn.
    pub fn is_renderable(&self) -> bool {
        self.is_loaded() && self.patches.iter().all(TerrainPatch::is_renderable)
    }

    /// Meshes to draw this frame.
    pub fn collect_render_meshes(&self) -> Vec<MeshHandle> {
        let mut out = Vec::new();
        for patch in &self.patches {
            patch.collect_render_meshes(&mut out);
        }
        out
    }

    pub fn stats(&self) -> PatchStats {
        let mut stats = PatchStats::default();
        for patch in &self.patches {
            stats.merge(patch.stats());
        }
        stats
    }

    fn init_patches(&mut self) {
        let radius = self.context.terrain.radius;
        let width = self.context.terrain.patch_width;
        let row = self.patch_row;

        self.patches.reserve(root_patch_count(row));
        for face in CubeFace::ALL {
            for z in 0..row {
                for x in 0..row {
                    let grid = DVec2::new(
                        -radius + f64::from(x) * width,
                        -radius + f64::from(z) * width,
                    );
                    self.patches
                        .push(TerrainPatch::new(grid, face, 0, Arc::clone(&self.context), width));
                }
            }
        }
        info!(
            patches = self.patches.len(),
            radius, width, "initialized spherical terrain patches"
        );
    }
}

/// Number of root patches across all six faces.
fn root_patch_count(patch_row: u32) -> usize {
    CubeFace::ALL.len() * (patch_row as usize).pow(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LodParams, TerrainPatchData};
    use orrery_mesh::{
        MeshDeletionQueue, TerrainDispatcher, TerrainGenRequest, TerrainPatchMesh,
        build_patch_mesh,
    };

    /// Completes every request synchronously.
    struct InstantDispatcher;

    impl TerrainDispatcher for InstantDispatcher {
        fn dispatch_terrain_gen(&self, request: TerrainGenRequest) -> MeshHandle {
            let data = build_patch_mesh(&request, 4);
            let mesh = TerrainPatchMesh::pending(request);
            mesh.complete(data);
            mesh
        }
    }

    const RADIUS: f64 = 100.0;

    fn terrain(patch_row: u32) -> (SphericalTerrain, MeshDeletionQueue) {
        let queue = MeshDeletionQueue::new();
        let context = Arc::new(PatchContext {
            terrain: TerrainPatchData {
                radius: RADIUS,
                patch_width: 2.0 * RADIUS / f64::from(patch_row),
            },
            params: LodParams::default(),
            dispatcher: Arc::new(InstantDispatcher),
            releaser: queue.releaser(),
        });
        (SphericalTerrain::new(context, patch_row, 50.0 * RADIUS), queue)
    }

    #[test]
    fn test_roots_cover_every_face() {
        let (mut t, _queue) = terrain(2);
        t.update(DVec3::new(0.0, 0.0, 40.0 * RADIUS));
        assert_eq!(t.root_patches().len(), 24);
        for face in CubeFace::ALL {
            let on_face: Vec<_> = t
                .root_patches()
                .iter()
                .filter(|p| p.cube_face() == face)
                .collect();
            assert_eq!(on_face.len(), 4);
            let mut grids: Vec<_> = on_face.iter().map(|p| p.grid_position()).collect();
            grids.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
            assert_eq!(
                grids,
                vec![
                    DVec2::new(-RADIUS, -RADIUS),
                    DVec2::new(-RADIUS, 0.0),
                    DVec2::new(0.0, -RADIUS),
                    DVec2::new(0.0, 0.0),
                ]
            );
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_root_patch_count_does_not_overflow_u32() {
        assert_eq!(root_patch_count(1), 6);
        assert_eq!(root_patch_count(3), 54);
        // 6 * 65536² exceeds u32::MAX.
        assert_eq!(root_patch_count(65_536), 6 * (1usize << 32));
    }

    #[test]
    fn test_far_camera_keeps_roots_as_renderable_leaves() {
        let (mut t, _queue) = terrain(1);
        t.update(DVec3::new(0.0, 0.0, 40.0 * RADIUS));
        let stats = t.stats();
        assert_eq!(stats.patches, 6);
        assert_eq!(stats.leaves, 6);
        assert!(t.is_renderable());
        assert_eq!(t.collect_render_meshes().len(), 6);
    }

    #[test]
    fn test_near_camera_refines_and_stays_renderable() {
        let (mut t, _queue) = terrain(1);
        let camera = DVec3::new(0.0, RADIUS + 0.5, 0.0);
        for _ in 0..4 {
            t.update(camera);
        }
        let stats = t.stats();
        assert!(stats.max_lod > 4, "expected deep refinement, got {stats:?}");
        assert!(t.is_renderable());
        assert!(!t.collect_render_meshes().is_empty());
    }

    #[test]
    fn test_leaving_range_unloads_and_returning_reloads() {
        let (mut t, queue) = terrain(1);
        t.update(DVec3::new(0.0, RADIUS * 2.0, 0.0));
        assert!(t.is_loaded());
        queue.drain();

        t.update(DVec3::new(0.0, RADIUS * 60.0, 0.0));
        assert!(!t.is_loaded());
        assert!(!t.is_renderable());
        assert!(queue.pending_count() >= 6);

        t.update(DVec3::new(0.0, RADIUS * 2.0, 0.0));
        assert!(t.is_loaded());
        assert_eq!(t.root_patches().len(), 6);
    }
}
