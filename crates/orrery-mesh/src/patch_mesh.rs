//! The renderable artifact handed from a mesh producer to a terrain patch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use glam::DVec3;
use orrery_math::Aabb;

use crate::TerrainGenRequest;

/// Shared handle to a patch mesh. The producer, the patch, and the deletion
/// queue each hold a clone; the last one dropped frees it.
pub type MeshHandle = Arc<TerrainPatchMesh>;

/// Built data backing a [`TerrainPatchMesh`].
#[derive(Clone, Debug, PartialEq)]
pub struct PatchMeshData {
    /// World-space bounds of the generated surface, curvature included.
    pub bounds: Aabb,
    /// Number of surface samples the bounds were computed from.
    pub sample_count: usize,
}

/// A terrain patch mesh that may still be under construction.
///
/// Readiness is single-writer: the producer calls [`complete`](Self::complete)
/// once, and the update thread observes it through
/// [`is_renderable`](Self::is_renderable) without further synchronization.
/// Deletion intent is one-way; once set it is never cleared.
#[derive(Debug)]
pub struct TerrainPatchMesh {
    request: TerrainGenRequest,
    data: OnceLock<PatchMeshData>,
    renderable: AtomicBool,
    should_delete: AtomicBool,
}

impl TerrainPatchMesh {
    /// A not-yet-ready mesh for the given request.
    #[must_use]
    pub fn pending(request: TerrainGenRequest) -> MeshHandle {
        Arc::new(Self {
            request,
            data: OnceLock::new(),
            renderable: AtomicBool::new(false),
            should_delete: AtomicBool::new(false),
        })
    }

    /// The request this mesh was dispatched for.
    pub fn request(&self) -> &TerrainGenRequest {
        &self.request
    }

    /// Publish the built data and mark the mesh renderable.
    ///
    /// Returns `false` if the mesh was already completed; the new data is discarded.
    pub fn complete(&self, data: PatchMeshData) -> bool {
        if self.data.set(data).is_err() {
            return false;
        }
        self.renderable.store(true, Ordering::Release);
        true
    }

    /// Whether the backing data is available.
    pub fn is_renderable(&self) -> bool {
        self.renderable.load(Ordering::Acquire)
    }

    /// Built data, once renderable.
    pub fn data(&self) -> Option<&PatchMeshData> {
        if self.is_renderable() {
            self.data.get()
        } else {
            None
        }
    }

    /// Closest point of the built surface bounds to `p`, or `None` while not ready.
    pub fn closest_point(&self, p: DVec3) -> Option<DVec3> {
        self.data().map(|d| d.bounds.closest_point(p))
    }

    /// Signal that the owner no longer needs this mesh.
    pub fn request_delete(&self) {
        self.should_delete.store(true, Ordering::Release);
    }

    pub fn should_delete(&self) -> bool {
        self.should_delete.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use orrery_cubesphere::CubeFace;

    fn request() -> TerrainGenRequest {
        TerrainGenRequest {
            start_pos: DVec3::new(0.0, 10.0, 0.0),
            width: 1.0,
            lod: 0,
            cube_face: CubeFace::PosY,
            is_leaf: true,
        }
    }

    fn data() -> PatchMeshData {
        PatchMeshData {
            bounds: Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0)),
            sample_count: 4,
        }
    }

    #[test]
    fn test_pending_mesh_is_not_renderable() {
        let mesh = TerrainPatchMesh::pending(request());
        assert!(!mesh.is_renderable());
        assert!(mesh.data().is_none());
        assert!(mesh.closest_point(DVec3::ZERO).is_none());
    }

    #[test]
    fn test_complete_publishes_data() {
        let mesh = TerrainPatchMesh::pending(request());
        assert!(mesh.complete(data()));
        assert!(mesh.is_renderable());
        assert_eq!(mesh.data(), Some(&data()));
        assert_eq!(
            mesh.closest_point(DVec3::new(5.0, 0.0, 0.0)),
            Some(DVec3::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_second_complete_is_rejected() {
        let mesh = TerrainPatchMesh::pending(request());
        assert!(mesh.complete(data()));
        let mut other = data();
        other.sample_count = 99;
        assert!(!mesh.complete(other));
        assert_eq!(mesh.data().unwrap().sample_count, 4);
    }

    #[test]
    fn test_delete_intent_is_sticky() {
        let mesh = TerrainPatchMesh::pending(request());
        assert!(!mesh.should_delete());
        mesh.request_delete();
        mesh.request_delete();
        assert!(mesh.should_delete());
    }

    #[test]
    fn test_completion_visible_across_threads() {
        let mesh = TerrainPatchMesh::pending(request());
        let producer = Arc::clone(&mesh);
        std::thread::spawn(move || {
            producer.complete(data());
        })
        .join()
        .unwrap();
        assert!(mesh.is_renderable());
        assert_eq!(mesh.data().unwrap().sample_count, 4);
    }
}
