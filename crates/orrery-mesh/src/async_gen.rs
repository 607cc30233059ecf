//! Threaded mesh dispatcher: offloads patch mesh generation to a worker pool
//! and publishes results through each handle's readiness flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, error, trace};

use crate::builder::build_patch_mesh;
use crate::{MeshHandle, TerrainDispatcher, TerrainGenRequest, TerrainPatchMesh};

/// [`TerrainDispatcher`] backed by a pool of OS threads.
///
/// [`dispatch_terrain_gen`](TerrainDispatcher::dispatch_terrain_gen) never
/// blocks: the task channel is unbounded and the handle is returned before any
/// work starts. Handles that carry deletion intent by the time a worker picks
/// them up are skipped.
pub struct ThreadedTerrainDispatcher {
    task_sender: Option<Sender<MeshHandle>>,
    worker_handles: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl ThreadedTerrainDispatcher {
    /// Spawn `worker_count` workers (at least one) sampling patches at `resolution`.
    pub fn new(worker_count: usize, resolution: u32) -> Self {
        let (task_tx, task_rx) = unbounded::<MeshHandle>();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        let worker_count = worker_count.max(1);
        let mut handles = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let rx: Receiver<MeshHandle> = task_rx.clone();
            let flight = Arc::clone(&in_flight);
            let done = Arc::clone(&completed);

            let spawned = std::thread::Builder::new()
                .name(format!("terrain-gen-{i}"))
                .spawn(move || {
                    while let Ok(mesh) = rx.recv() {
                        if mesh.should_delete() {
                            trace!(lod = mesh.request().lod, "skipping abandoned mesh request");
                        } else {
                            let data = build_patch_mesh(mesh.request(), resolution);
                            if mesh.complete(data) {
                                done.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        flight.fetch_sub(1, Ordering::Relaxed);
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => error!("failed to spawn terrain generation worker: {e}"),
            }
        }
        debug!(workers = handles.len(), resolution, "terrain dispatcher started");

        Self {
            task_sender: Some(task_tx),
            worker_handles: handles,
            in_flight,
            completed,
        }
    }

    /// Create a dispatcher sized to the machine, leaving headroom for the
    /// update and render threads.
    pub fn with_defaults(resolution: u32) -> Self {
        let cpus = num_cpus::get().max(2);
        Self::new((cpus - 2).max(1), resolution)
    }

    /// Number of requests queued or being processed.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Number of meshes completed since startup.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Shut down all worker threads after they finish queued work.
    pub fn shutdown(&mut self) {
        // Dropping the sender closes the channel, causing workers to exit.
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl TerrainDispatcher for ThreadedTerrainDispatcher {
    fn dispatch_terrain_gen(&self, request: TerrainGenRequest) -> MeshHandle {
        let mesh = TerrainPatchMesh::pending(request);
        let Some(sender) = &self.task_sender else {
            // Never completes; the patch keeps waiting like any unanswered request.
            return mesh;
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if sender.send(Arc::clone(&mesh)).is_err() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
        }
        mesh
    }
}

impl Drop for ThreadedTerrainDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
