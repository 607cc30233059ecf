//! Double-precision geometry shared by the planet LOD crates.

mod aabb;

pub use aabb::Aabb;
