//! Headless driver: orbits a camera around a planet and runs the terrain LOD
//! update, mesh hand-off, and deferred deletion once per simulated frame.

pub mod orbit;
pub mod platform;
pub mod runtime;

pub use orbit::{FIXED_DT, OrbitCamera};
pub use platform::{PlatformDirs, PlatformError};
pub use runtime::{FrameReport, PlanetRuntime, RuntimeError};
