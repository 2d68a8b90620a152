mod coordinator;
mod render_worker;
mod traced_image;
pub mod whitted;

use std::sync::{mpsc, Arc};
use std::thread;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::scene::Scene;
use crate::stats;

use self::coordinator::RenderCoordinator;
use self::render_worker::RenderWorker;
pub use self::traced_image::TracedImage;

/// Render the scene to completion with a pool of worker threads.
/// Workers share the read only scene and pull blocks from the
/// coordinator until the image is done.
pub fn offline_render(scene: &Arc<Scene>, camera: &Camera, config: &RenderConfig) -> TracedImage {
    assert_eq!(
        (camera.width, camera.height),
        (config.width, config.height),
        "Camera viewport doesn't match the render target!"
    );
    stats::start_render();
    let coordinator = Arc::new(RenderCoordinator::new(config));
    let (result_tx, result_rx) = mpsc::channel();
    let mut thread_handles = Vec::new();
    for _ in 0..config.max_threads.max(1) {
        let result_tx = result_tx.clone();
        let coordinator = Arc::clone(&coordinator);
        let scene = Arc::clone(scene);
        let camera = camera.clone();
        let config = config.clone();
        thread_handles.push(thread::spawn(move || {
            RenderWorker::new(scene, camera, config, coordinator, result_tx).run();
        }));
    }
    // Drop the original sender so the receiver finishes with the workers
    drop(result_tx);
    let mut image = TracedImage::new(config.width, config.height);
    for (block, data) in result_rx {
        image.update_block(&block, &data);
    }
    for handle in thread_handles {
        handle.join().expect("Render worker panicked!");
    }
    stats::stop_render();
    image
}
