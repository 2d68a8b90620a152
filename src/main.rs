mod aabb;
mod bvh;
mod camera;
mod color;
mod config;
mod consts;
mod float;
mod geometry;
mod intersect;
mod light;
mod mapping;
mod material;
mod rt_renderer;
mod scene;
mod scenes;
mod stats;
mod texture;
mod triangle;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::config::RenderConfig;
pub use crate::float::{Float, ToFloat};

fn main() {
    // Render only the scenes whose name contains the given filter
    let filter = std::env::args().nth(1);
    let config = RenderConfig::default();

    let root_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let save_path = root_path.join("results");
    if !save_path.exists() {
        std::fs::create_dir_all(&save_path).expect("Failed to create results directory!");
    }

    for (name, build_scene) in scenes::demo_scenes() {
        if let Some(filter) = &filter {
            if !name.contains(filter.as_str()) {
                continue;
            }
        }
        println!("Rendering {}", name);
        stats::new_scene(name);
        let (scene, camera) = build_scene(&config);
        let scene = Arc::new(scene);
        let image = rt_renderer::offline_render(&scene, &camera, &config);
        let image_path = save_path.join(format!("{}.png", name));
        image.save(&image_path).expect("Failed to save image!");
        println!("Saved {:?}", image_path);
    }

    let stats_path = save_path.join(Local::now().format("stats_%F_%H%M%S.txt").to_string());
    stats::print_and_save(&stats_path);
}
