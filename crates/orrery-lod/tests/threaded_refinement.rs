//! Drives a whole planet with the threaded dispatcher, the way the app does.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::DVec3;
use orrery_lod::{LodParams, PatchContext, SphericalTerrain, TerrainPatchData};
use orrery_mesh::{MeshDeletionQueue, ThreadedTerrainDispatcher};

const RADIUS: f64 = 500.0;

fn planet(dispatcher: Arc<ThreadedTerrainDispatcher>) -> (SphericalTerrain, MeshDeletionQueue) {
    let queue = MeshDeletionQueue::new();
    let context = Arc::new(PatchContext {
        terrain: TerrainPatchData {
            radius: RADIUS,
            patch_width: RADIUS,
        },
        params: LodParams::default(),
        dispatcher,
        releaser: queue.releaser(),
    });
    (SphericalTerrain::new(context, 2, RADIUS * 100.0), queue)
}

fn run_until_renderable(terrain: &mut SphericalTerrain, camera: DVec3) {
    let start = Instant::now();
    loop {
        terrain.update(camera);
        if terrain.is_renderable() {
            return;
        }
        assert!(start.elapsed().as_secs() < 10, "terrain never became renderable");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_planet_becomes_renderable_from_orbit() {
    let dispatcher = Arc::new(ThreadedTerrainDispatcher::new(2, 4));
    let (mut terrain, _queue) = planet(Arc::clone(&dispatcher));

    run_until_renderable(&mut terrain, DVec3::new(0.0, 0.0, RADIUS * 10.0));
    let stats = terrain.stats();
    assert_eq!(stats.patches, 24);
    assert_eq!(stats.ready_meshes, 24);
    assert_eq!(terrain.collect_render_meshes().len(), 24);
}

#[test]
fn test_descent_refines_and_ascent_merges() {
    let dispatcher = Arc::new(ThreadedTerrainDispatcher::new(2, 4));
    let (mut terrain, queue) = planet(Arc::clone(&dispatcher));

    let high = DVec3::new(0.0, RADIUS * 10.0, 0.0);
    let low = DVec3::new(10.0, RADIUS + 2.0, -10.0);

    run_until_renderable(&mut terrain, high);
    let coarse = terrain.stats();

    run_until_renderable(&mut terrain, low);
    // Let the hand-off finish so parents give their meshes up.
    for _ in 0..4 {
        terrain.update(low);
    }
    let fine = terrain.stats();
    assert!(fine.max_lod > coarse.max_lod);
    assert!(fine.patches > coarse.patches);

    // Merging waits for each parent's new mesh, so keep updating until it lands.
    let start = Instant::now();
    while terrain.stats().patches != coarse.patches {
        terrain.update(high);
        assert!(start.elapsed().as_secs() < 10, "terrain never merged back");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(terrain.is_renderable());
    let released = queue.drain();
    assert!(!released.is_empty());
    assert!(released.iter().all(|m| m.should_delete()));
}
