//! Cube-sphere geometry: the six cube faces, their grid-to-world axis mapping,
//! and projection of face-grid coordinates onto the planet sphere.

mod cube_face;
mod face_grid;

pub use cube_face::{CoordMapping, CubeFace};
pub use face_grid::{anchor_to_grid, face_anchor, grid_to_cube_point, grid_to_sphere};
