//! Face-grid coordinates and their projection onto the sphere.
//!
//! Grid coordinates on every face span `[-radius, radius]` on both axes, so a
//! grid point together with the face's up axis at `radius` is a point on the
//! surface of a cube enclosing the planet.

use glam::{DVec2, DVec3};

use crate::CubeFace;

/// Place a face-grid coordinate on the surface of the cube of half-size `radius`.
#[inline]
#[must_use]
pub fn grid_to_cube_point(face: CubeFace, grid: DVec2, radius: f64) -> DVec3 {
    let m = face.coord_mapping();
    let mut p = DVec3::ZERO;
    p[m.axes[0]] = grid.x * f64::from(m.grid_mults[0]);
    p[m.axes[1]] = radius * f64::from(m.up);
    p[m.axes[2]] = grid.y * f64::from(m.grid_mults[1]);
    p
}

/// Project a face-grid coordinate onto the sphere of the given radius.
#[inline]
#[must_use]
pub fn grid_to_sphere(face: CubeFace, grid: DVec2, radius: f64) -> DVec3 {
    grid_to_cube_point(face, grid, radius).normalize() * radius
}

/// Face-space anchor for a grid coordinate: signs applied, axes not permuted.
///
/// This is the position mesh generation requests are keyed on.
#[inline]
#[must_use]
pub fn face_anchor(face: CubeFace, grid: DVec2, radius: f64) -> DVec3 {
    let m = face.coord_mapping();
    DVec3::new(
        grid.x * f64::from(m.grid_mults[0]),
        radius * f64::from(m.up),
        grid.y * f64::from(m.grid_mults[1]),
    )
}

/// Inverse of [`face_anchor`]: recover `(grid, radius)` from an anchor.
#[inline]
#[must_use]
pub fn anchor_to_grid(face: CubeFace, anchor: DVec3) -> (DVec2, f64) {
    let m = face.coord_mapping();
    let grid = DVec2::new(
        anchor.x * f64::from(m.grid_mults[0]),
        anchor.z * f64::from(m.grid_mults[1]),
    );
    (grid, anchor.y * f64::from(m.up))
}
