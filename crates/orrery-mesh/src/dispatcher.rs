//! The contract between terrain patches and whatever produces their meshes.

use glam::{DVec2, DVec3};
use orrery_cubesphere::{CubeFace, anchor_to_grid};

use crate::MeshHandle;

/// A request to generate the mesh for one terrain patch.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainGenRequest {
    /// Face-space anchor of the patch's near corner (see [`orrery_cubesphere::face_anchor`]).
    pub start_pos: DVec3,
    /// Patch side length in grid units.
    pub width: f64,
    /// Subdivision depth of the requesting patch.
    pub lod: u32,
    pub cube_face: CubeFace,
    /// Whether the mesh is for a leaf patch.
    pub is_leaf: bool,
}

impl TerrainGenRequest {
    /// Grid position of the patch's near corner.
    #[must_use]
    pub fn grid_position(&self) -> DVec2 {
        anchor_to_grid(self.cube_face, self.start_pos).0
    }

    /// Planet radius the request was made against.
    #[must_use]
    pub fn radius(&self) -> f64 {
        anchor_to_grid(self.cube_face, self.start_pos).1
    }
}

/// Accepts mesh generation requests and returns handles that become
/// renderable later.
///
/// Implementations must not block the caller. The returned handle is valid
/// immediately but need not be ready.
pub trait TerrainDispatcher: Send + Sync {
    fn dispatch_terrain_gen(&self, request: TerrainGenRequest) -> MeshHandle;
}
