//! Terrain patch meshes and the contract for producing them off the update thread:
//! shared mesh handles with atomic readiness, the dispatcher trait, a threaded
//! dispatcher, and the deferred deletion queue owned by the render side.

mod async_gen;
mod builder;
mod deletion;
mod dispatcher;
mod patch_mesh;

pub use async_gen::ThreadedTerrainDispatcher;
pub use builder::build_patch_mesh;
pub use deletion::{MeshDeletionQueue, MeshReleaser};
pub use dispatcher::{TerrainDispatcher, TerrainGenRequest};
pub use patch_mesh::{MeshHandle, PatchMeshData, TerrainPatchMesh};
