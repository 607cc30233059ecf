//! Level-of-detail quadtree for planetary terrain: per-patch split/merge with
//! hysteresis, horizon culling, and asynchronous mesh hand-off.

mod horizon_culling;
mod params;
mod patch;
mod spherical_terrain;

pub use horizon_culling::{HorizonVector, is_over_horizon};
pub use params::{LodParams, LodParamsError};
pub use patch::{PatchContext, PatchStats, TerrainPatch, TerrainPatchData};
pub use spherical_terrain::SphericalTerrain;
