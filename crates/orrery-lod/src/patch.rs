//! Quadtree node covering a square region of one cube face.
//!
//! Each frame a patch measures its distance to the camera, then either splits
//! into four children, merges its children back, hands rendering over from its
//! own mesh to its children, or asks the dispatcher for a mesh. Meshes arrive
//! asynchronously; a parent keeps its mesh until all four children can be
//! drawn, so no gaps appear during the hand-off.

use std::sync::Arc;

use glam::{DVec2, DVec3};
use orrery_cubesphere::{CubeFace, face_anchor, grid_to_sphere};
use orrery_math::Aabb;
use orrery_mesh::{MeshHandle, MeshReleaser, TerrainDispatcher, TerrainGenRequest};
use tracing::{debug, trace};

use crate::{LodParams, is_over_horizon};

/// Read-only per-planet terrain data shared by every patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPatchData {
    pub radius: f64,
    /// Width of a root patch in grid units.
    pub patch_width: f64,
}

/// Collaborators shared by every patch of one planet.
pub struct PatchContext {
    pub terrain: TerrainPatchData,
    pub params: LodParams,
    pub dispatcher: Arc<dyn TerrainDispatcher>,
    pub releaser: MeshReleaser,
}

/// Counts gathered over a patch subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    /// Every node, leaves included.
    pub patches: usize,
    pub leaves: usize,
    /// Held meshes that are renderable.
    pub ready_meshes: usize,
    /// Held meshes still waiting on the dispatcher.
    pub pending_meshes: usize,
    /// Deepest LOD present.
    pub max_lod: u32,
}

impl PatchStats {
    pub fn merge(&mut self, other: PatchStats) {
        self.patches += other.patches;
        self.leaves += other.leaves;
        self.ready_meshes += other.ready_meshes;
        self.pending_meshes += other.pending_meshes;
        self.max_lod = self.max_lod.max(other.max_lod);
    }
}

/// A quadtree node of planetary terrain.
///
/// Holds a mesh, four children, neither, or briefly both while children are
/// still becoming renderable. Children are indexed `(z << 1) + x`.
pub struct TerrainPatch {
    grid_position: DVec2,
    cube_face: CubeFace,
    lod: u32,
    width: f64,
    /// Four-corner approximation of the curved patch, widened by built mesh bounds.
    aabb: Aabb,
    distance: f64,
    mesh: Option<MeshHandle>,
    children: Option<Box<[TerrainPatch; 4]>>,
    context: Arc<PatchContext>,
}

impl TerrainPatch {
    /// Create a patch and compute its approximate bounding box from the four
    /// grid corners projected onto the sphere.
    pub fn new(
        grid_position: DVec2,
        cube_face: CubeFace,
        lod: u32,
        context: Arc<PatchContext>,
        width: f64,
    ) -> Self {
        let radius = context.terrain.radius;
        let corners = [
            DVec2::ZERO,
            DVec2::new(0.0, width),
            DVec2::new(width, width),
            DVec2::new(width, 0.0),
        ]
        .map(|offset| grid_to_sphere(cube_face, grid_position + offset, radius));
        let aabb = Aabb::from_points(corners).unwrap_or_else(|| Aabb::new(corners[0], corners[0]));

        Self {
            grid_position,
            cube_face,
            lod,
            width,
            aabb,
            distance: f64::INFINITY,
            mesh: None,
            children: None,
            context,
        }
    }

    pub fn grid_position(&self) -> DVec2 {
        self.grid_position
    }

    pub fn cube_face(&self) -> CubeFace {
        self.cube_face
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Distance to the camera measured by the last [`update`](Self::update).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The held mesh handle, ready or not.
    pub fn mesh(&self) -> Option<&MeshHandle> {
        self.mesh.as_ref()
    }

    pub fn children(&self) -> Option<&[TerrainPatch; 4]> {
        self.children.as_deref()
    }

    /// Run one frame of split/merge/mesh logic for this patch and its subtree.
    ///
    /// `camera_pos` is relative to the planet centre.
    pub fn update(&mut self, camera_pos: DVec3) {
        let closest_point = self.calculate_closest_point_and_dist(camera_pos);
        let params = self.context.params;

        if self.children.is_some() {
            if self.distance > self.width * params.dist_max {
                if self.mesh.is_none() {
                    self.request_mesh();
                }
                if self.has_mesh() {
                    debug!(
                        face = ?self.cube_face,
                        lod = self.lod,
                        distance = self.distance,
                        "merging terrain patch"
                    );
                    self.children = None;
                }
            } else if self.mesh.is_some() && self.children_renderable() {
                // Children can take over drawing; the render side frees the mesh.
                self.release_mesh();
            }
        } else if self.can_subdivide()
            && !is_over_horizon(camera_pos, closest_point, self.context.terrain.radius)
        {
            self.subdivide();
        } else if self.mesh.is_none() {
            self.request_mesh();
        }

        if let Some(children) = self.children.as_deref_mut() {
            for child in children.iter_mut() {
                child.update(camera_pos);
            }
        }
    }

    /// Whether this patch may split given its last measured distance.
    pub fn can_subdivide(&self) -> bool {
        let params = &self.context.params;
        self.lod < params.max_lod
            && self.distance < self.width * params.dist_min
            && self.width > params.min_size
    }

    /// True iff a mesh is held and it is renderable.
    pub fn has_mesh(&self) -> bool {
        self.mesh.as_ref().is_some_and(|m| m.is_renderable())
    }

    /// True if this patch can be drawn: through its own mesh, or through all
    /// four children recursively.
    pub fn is_renderable(&self) -> bool {
        if self.has_mesh() {
            return true;
        }
        self.children_renderable()
    }

    /// Release the mesh for deferred deletion and drop all children.
    /// Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.release_mesh();
        self.children = None;
    }

    /// Collect the meshes that should be drawn for this subtree.
    ///
    /// Fully renderable children take precedence over this patch's mesh; a
    /// patch whose children are still loading draws its own mesh instead.
    pub fn collect_render_meshes(&self, out: &mut Vec<MeshHandle>) {
        if let Some(children) = self.children.as_deref() {
            if children.iter().all(TerrainPatch::is_renderable) || !self.has_mesh() {
                for child in children {
                    child.collect_render_meshes(out);
                }
                return;
            }
        }
        if let Some(mesh) = self.mesh.as_ref().filter(|m| m.is_renderable()) {
            out.push(Arc::clone(mesh));
        }
    }

    /// Node, leaf, and mesh counts over this subtree.
    pub fn stats(&self) -> PatchStats {
        let mut stats = PatchStats {
            patches: 1,
            leaves: usize::from(self.children.is_none()),
            ready_meshes: usize::from(self.has_mesh()),
            pending_meshes: usize::from(self.mesh.is_some() && !self.has_mesh()),
            max_lod: self.lod,
        };
        if let Some(children) = self.children.as_deref() {
            for child in children {
                stats.merge(child.stats());
            }
        }
        stats
    }

    fn children_renderable(&self) -> bool {
        self.children
            .as_deref()
            .is_some_and(|children| children.iter().all(TerrainPatch::is_renderable))
    }

    fn subdivide(&mut self) {
        debug!(
            face = ?self.cube_face,
            lod = self.lod,
            distance = self.distance,
            "subdividing terrain patch"
        );
        let half = self.width / 2.0;
        let children = std::array::from_fn(|i| {
            let (x, z) = (i & 1, i >> 1);
            let offset = DVec2::new(half * x as f64, half * z as f64);
            TerrainPatch::new(
                self.grid_position + offset,
                self.cube_face,
                self.lod + 1,
                Arc::clone(&self.context),
                half,
            )
        });
        self.children = Some(Box::new(children));
    }

    fn request_mesh(&mut self) {
        debug_assert!(
            self.mesh.is_none(),
            "mesh requested for a patch that already holds one"
        );
        let start_pos = face_anchor(
            self.cube_face,
            self.grid_position,
            self.context.terrain.radius,
        );
        trace!(face = ?self.cube_face, lod = self.lod, "requesting terrain mesh");
        self.mesh = Some(self.context.dispatcher.dispatch_terrain_gen(TerrainGenRequest {
            start_pos,
            width: self.width,
            lod: self.lod,
            cube_face: self.cube_face,
            is_leaf: true,
        }));
    }

    fn release_mesh(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            self.context.releaser.release(mesh);
        }
    }

    /// Closest point of this patch to the camera, using the built mesh when
    /// available and the approximate box otherwise. Updates `distance`.
    ///
    /// A built mesh's bounds are folded into `aabb`, so the fallback keeps the
    /// surface bulge after the mesh is handed over to the children.
    fn calculate_closest_point_and_dist(&mut self, camera_pos: DVec3) -> DVec3 {
        if let Some(data) = self.mesh.as_ref().and_then(|m| m.data()) {
            self.aabb = self.aabb.union(&data.bounds);
        }
        let closest = self
            .mesh
            .as_ref()
            .and_then(|m| m.closest_point(camera_pos))
            .unwrap_or_else(|| self.aabb.closest_point(camera_pos));
        self.distance = (closest - camera_pos).length();
        closest
    }
}

impl Drop for TerrainPatch {
    fn drop(&mut self) {
        self.destroy();
    }
}
