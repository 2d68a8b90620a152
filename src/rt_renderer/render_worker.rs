use std::sync::{mpsc::Sender, Arc};

use crate::camera::Camera;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::float::*;
use crate::scene::Scene;

use super::coordinator::{Block, RenderCoordinator};
use super::whitted;

pub struct RenderWorker {
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    coordinator: Arc<RenderCoordinator>,
    result_tx: Sender<(Block, Vec<f32>)>,
}

impl RenderWorker {
    pub(super) fn new(
        scene: Arc<Scene>,
        camera: Camera,
        config: RenderConfig,
        coordinator: Arc<RenderCoordinator>,
        result_tx: Sender<(Block, Vec<f32>)>,
    ) -> RenderWorker {
        RenderWorker {
            scene,
            camera,
            config,
            coordinator,
            result_tx,
        }
    }

    pub fn run(&self) {
        let spp = self.config.spp.max(1);
        // Stratify when the sample count fills a square grid
        let strata = (spp.to_float().sqrt().round()) as usize;
        let strata = if self.config.stratified && strata * strata == spp {
            Some(strata)
        } else {
            None
        };
        while let Some(block) = self.coordinator.next_block() {
            let mut data = vec![0.0f32; (3 * block.width * block.height) as usize];
            for h in 0..block.height {
                for w in 0..block.width {
                    let px = block.left + w;
                    let py = block.top + h;
                    let corner_rays = self.camera.corner_rays(px, py);
                    let mut c = Color::black();
                    for s in 0..spp {
                        let (dx, dy) = sample_offset(s, strata);
                        let ray = self
                            .camera
                            .ray_through(px.to_float() + dx, py.to_float() + dy);
                        c += whitted::trace_recursive(
                            &self.scene,
                            &ray,
                            Some(&corner_rays),
                            0,
                            &self.config,
                        );
                    }
                    c /= spp.to_float();
                    let i = 3 * (h * block.width + w) as usize;
                    data[i] = c.r() as f32;
                    data[i + 1] = c.g() as f32;
                    data[i + 2] = c.b() as f32;
                }
            }
            self.result_tx
                .send((block, data))
                .expect("Receiver closed!");
        }
    }
}

/// Jittered sample position inside a pixel
fn sample_offset(s: usize, strata: Option<usize>) -> (Float, Float) {
    match strata {
        Some(n) => {
            let i = s % n;
            let j = s / n;
            (
                (i.to_float() + rand::random::<Float>()) / n.to_float(),
                (j.to_float() + rand::random::<Float>()) / n.to_float(),
            )
        }
        None => (rand::random(), rand::random()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_offsets_stay_inside_the_pixel() {
        for s in 0..9 {
            let (dx, dy) = sample_offset(s, Some(3));
            assert!((0.0..1.0).contains(&dx));
            assert!((0.0..1.0).contains(&dy));
            // Stratified samples stay inside their stratum
            let stratum = (s % 3).to_float() / 3.0;
            assert!(dx >= stratum && dx < stratum + 1.0 / 3.0);
        }
        let (dx, dy) = sample_offset(0, None);
        assert!((0.0..1.0).contains(&dx) && (0.0..1.0).contains(&dy));
    }
}
