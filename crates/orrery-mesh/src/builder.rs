//! Synchronous patch bounds builder used by mesh producers.

use glam::DVec2;
use orrery_cubesphere::grid_to_sphere;
use orrery_math::Aabb;

use crate::{PatchMeshData, TerrainGenRequest};

/// Sample an `(resolution + 1)²` grid across the requested patch, project each
/// sample onto the sphere, and bound the result.
///
/// Unlike the four-corner estimate a patch starts with, interior samples
/// capture the bulge of the sphere inside the patch.
#[must_use]
pub fn build_patch_mesh(request: &TerrainGenRequest, resolution: u32) -> PatchMeshData {
    let resolution = resolution.max(1);
    let origin = request.grid_position();
    let radius = request.radius();
    let step = request.width / f64::from(resolution);

    let samples = (0..=resolution).flat_map(move |z| {
        (0..=resolution).map(move |x| {
            let grid = origin + DVec2::new(f64::from(x), f64::from(z)) * step;
            grid_to_sphere(request.cube_face, grid, radius)
        })
    });

    let side = resolution as usize + 1;
    // A non-empty sample grid always yields bounds.
    let bounds = Aabb::from_points(samples).unwrap_or_else(|| {
        let p = grid_to_sphere(request.cube_face, origin, radius);
        Aabb::new(p, p)
    });

    PatchMeshData {
        bounds,
        sample_count: side * side,
    }
}
