//! Deferred mesh deletion.
//!
//! Patches never free meshes themselves. They hand the handle to a
//! [`MeshReleaser`], which flags it and moves it into the queue owned by
//! whichever subsystem manages render resource lifetimes. That subsystem
//! calls [`MeshDeletionQueue::drain`] when it is safe to free GPU data.

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::warn;

use crate::MeshHandle;

/// Receiving end of deferred mesh deletions.
pub struct MeshDeletionQueue {
    sender: Sender<MeshHandle>,
    receiver: Receiver<MeshHandle>,
}

/// Cloneable sending end handed to terrain patches.
#[derive(Clone, Debug)]
pub struct MeshReleaser {
    sender: Sender<MeshHandle>,
}

impl MeshDeletionQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A releaser feeding this queue.
    pub fn releaser(&self) -> MeshReleaser {
        MeshReleaser {
            sender: self.sender.clone(),
        }
    }

    /// Take every mesh released since the last drain.
    pub fn drain(&self) -> Vec<MeshHandle> {
        self.receiver.try_iter().collect()
    }

    /// Number of released meshes waiting to be drained.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for MeshDeletionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshReleaser {
    /// Mark the mesh for deletion and transfer it to the owning queue.
    pub fn release(&self, mesh: MeshHandle) {
        mesh.request_delete();
        if self.sender.send(mesh).is_err() {
            // Queue owner is gone; dropping our reference is all that is left to do.
            warn!("mesh deletion queue closed, dropping released mesh");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TerrainGenRequest, TerrainPatchMesh};
    use glam::DVec3;
    use orrery_cubesphere::CubeFace;
    use std::sync::Arc;

    fn pending() -> MeshHandle {
        TerrainPatchMesh::pending(TerrainGenRequest {
            start_pos: DVec3::new(0.0, 1.0, 0.0),
            width: 1.0,
            lod: 0,
            cube_face: CubeFace::PosY,
            is_leaf: true,
        })
    }

    #[test]
    fn test_release_flags_and_queues() {
        let queue = MeshDeletionQueue::new();
        let releaser = queue.releaser();
        let mesh = pending();
        releaser.release(Arc::clone(&mesh));

        assert!(mesh.should_delete());
        assert_eq!(queue.pending_count(), 1);
        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(Arc::ptr_eq(&drained[0], &mesh));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_release_after_queue_dropped_does_not_panic() {
        let queue = MeshDeletionQueue::new();
        let releaser = queue.releaser();
        drop(queue);
        let mesh = pending();
        releaser.release(Arc::clone(&mesh));
        assert!(mesh.should_delete());
        assert_eq!(Arc::strong_count(&mesh), 1);
    }

    #[test]
    fn test_releasers_from_many_threads() {
        let queue = MeshDeletionQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let releaser = queue.releaser();
                std::thread::spawn(move || {
                    for _ in 0..8 {
                        releaser.release(pending());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(queue.drain().len(), 32);
    }
}
