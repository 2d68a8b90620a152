use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use prettytable::{cell, Row, Table};

use crate::intersect::Ray;

// Helper trait to print out the float type used
trait FloatName {
    fn float_name() -> String;
}

impl FloatName for f32 {
    fn float_name() -> String {
        "f32".to_string()
    }
}

impl FloatName for f64 {
    fn float_name() -> String {
        "f64".to_string()
    }
}

lazy_static::lazy_static! {
    static ref STATS: Mutex<Statistics> = Mutex::new(Statistics::new());
}

macro_rules! stats {
    () => {
        STATS.lock().unwrap()
    };
}

pub fn print_and_save(path: &Path) {
    let table = stats!().table();
    table.printstd();
    let mut stats_file = File::create(path).expect("Failed to create stats file!");
    table.print(&mut stats_file).expect("Failed to save stats!");
}

pub fn new_scene(name: &str) {
    stats!().new_scene(name);
}

pub fn start_bvh() {
    start_timer("BVH");
}

pub fn stop_bvh(bvh_size: usize, n_tris: usize) {
    let mut stats = stats!();
    if let Some(scene) = stats.current() {
        scene.stop_timer("BVH");
        scene.n_tris += n_tris;
        scene.bvh_size += bvh_size;
    }
}

pub fn start_render() {
    Ray::reset_count();
    start_timer("Render");
}

pub fn stop_render() {
    let mut stats = stats!();
    if let Some(scene) = stats.current() {
        scene.stop_timer("Render");
        scene.ray_count = Ray::count();
    }
}

fn start_timer(name: &str) {
    if let Some(scene) = stats!().current() {
        scene.start_timer(name);
    }
}

struct Statistics {
    scene_stats: Vec<SceneStatistics>,
}

impl Statistics {
    fn new() -> Statistics {
        Statistics {
            scene_stats: Vec::new(),
        }
    }

    fn new_scene(&mut self, name: &str) {
        self.scene_stats.push(SceneStatistics::new(name));
    }

    fn current(&mut self) -> Option<&mut SceneStatistics> {
        self.scene_stats.iter_mut().last()
    }

    fn table(&self) -> Table {
        let mut names = vec![cell!(crate::Float::float_name())];
        let mut build_times = vec![cell!("BVH build")];
        let mut render_times = vec![cell!("Render")];
        let mut mrps = vec![cell!("Mrays/s")];
        let mut n_rays = vec![cell!("Rays")];
        let mut n_tris = vec![cell!("Triangles")];
        let mut bvh_size = vec![cell!("BVH Nodes")];
        for stats in &self.scene_stats {
            names.push(cell!(stats.scene));
            build_times.push(cell!(stats.pretty_timer("BVH")));
            render_times.push(cell!(stats.pretty_timer("Render")));
            mrps.push(cell!(stats.mrps()));
            n_rays.push(cell!(stats.ray_count));
            n_tris.push(cell!(stats.n_tris));
            bvh_size.push(cell!(stats.bvh_size));
        }
        let mut table = Table::new();
        for row in vec![
            names,
            build_times,
            render_times,
            mrps,
            n_rays,
            n_tris,
            bvh_size,
        ] {
            table.add_row(Row::new(row));
        }
        table
    }
}

struct SceneStatistics {
    scene: String,
    timers: Vec<Timer>,
    ray_count: usize,
    n_tris: usize,
    bvh_size: usize,
}

impl SceneStatistics {
    fn new(name: &str) -> SceneStatistics {
        SceneStatistics {
            scene: name.to_string(),
            timers: Vec::new(),
            ray_count: 0,
            n_tris: 0,
            bvh_size: 0,
        }
    }

    fn start_timer(&mut self, name: &str) {
        self.timers.push(Timer::new(name));
    }

    fn stop_timer(&mut self, name: &str) {
        if let Some(timer) = self
            .timers
            .iter_mut()
            .rev()
            .find(|timer| timer.name == name && timer.duration.is_none())
        {
            timer.stop();
        }
    }

    fn get_timer(&self, name: &str) -> Option<&Timer> {
        self.timers.iter().find(|timer| timer.name == name)
    }

    fn pretty_timer(&self, name: &str) -> String {
        match self.get_timer(name) {
            Some(timer) => timer.pretty_duration(),
            None => "-".to_string(),
        }
    }

    fn total_duration(&self, name: &str) -> Option<Duration> {
        let mut total = Duration::new(0, 0);
        for timer in self.timers.iter().filter(|timer| timer.name == name) {
            total += timer.duration?;
        }
        Some(total)
    }

    fn mrps(&self) -> String {
        if let Some(duration) = self.total_duration("Render") {
            let mrps = self.ray_count as f64 / duration.as_secs_f64() / 1_000_000.0;
            format!("{:#.2?}", mrps)
        } else {
            "-".to_string()
        }
    }
}

#[derive(Clone, Debug)]
struct Timer {
    name: String,
    start: Instant,
    duration: Option<Duration>,
}

impl Timer {
    fn new(name: &str) -> Timer {
        Timer {
            name: name.to_string(),
            start: Instant::now(),
            duration: None,
        }
    }

    fn stop(&mut self) {
        assert!(
            self.duration.is_none(),
            "Tried to stop already stopped timer!"
        );
        self.duration = Some(self.start.elapsed());
    }

    fn pretty_duration(&self) -> String {
        if let Some(duration) = &self.duration {
            format!("{:#.2?}", duration)
        } else {
            format!("{:#.2?}", self.start.elapsed())
        }
    }
}
