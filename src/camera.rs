use cgmath::prelude::*;
use cgmath::{Deg, Matrix4, Point3, Vector3, Vector4};

use crate::float::*;
use crate::intersect::Ray;

/// Pinhole camera with a cached clip space to world space transform
#[derive(Clone)]
pub struct Camera {
    /// Position of the camera in world coordinates
    pub pos: Point3<Float>,
    /// Width of the viewport in pixels
    pub width: u32,
    /// Height of the viewport in pixels
    pub height: u32,
    clip_to_world: Matrix4<Float>,
}

impl Camera {
    pub fn new(
        pos: Point3<Float>,
        look_at: Point3<Float>,
        fov_y: Deg<Float>,
        (width, height): (u32, u32),
    ) -> Camera {
        assert!(width > 0 && height > 0, "Camera viewport is empty!");
        let aspect = width.to_float() / height.to_float();
        let world_to_camera = Matrix4::look_at_rh(pos, look_at, Vector3::unit_y());
        let camera_to_clip = cgmath::perspective(fov_y, aspect, 0.001, 1000.0);
        let clip_to_world = (camera_to_clip * world_to_camera)
            .invert()
            .expect("Non invertible view projection!");
        Camera {
            pos,
            width,
            height,
            clip_to_world,
        }
    }

    /// Ray through the given pixel coordinates.
    /// Fractional coordinates address positions inside a pixel and
    /// (0, 0) is the top left corner of the image.
    pub fn ray_through(&self, x: Float, y: Float) -> Ray {
        let clip_x = 2.0 * x / self.width.to_float() - 1.0;
        let clip_y = 1.0 - 2.0 * y / self.height.to_float();
        let clip_p = Vector4::new(clip_x, clip_y, 1.0, 1.0);
        let world_p = Point3::from_homogeneous(self.clip_to_world * clip_p);
        Ray::from_point(self.pos, world_p)
    }

    /// Rays through the four corners of a pixel,
    /// used to estimate the pixel footprint on surfaces
    pub fn corner_rays(&self, px: u32, py: u32) -> [Ray; 4] {
        let x = px.to_float();
        let y = py.to_float();
        [
            self.ray_through(x, y),
            self.ray_through(x + 1.0, y),
            self.ray_through(x, y + 1.0),
            self.ray_through(x + 1.0, y + 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_the_target() {
        let camera = Camera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::origin(),
            Deg(60.0),
            (100, 100),
        );
        let ray = camera.ray_through(50.0, 50.0);
        assert!((ray.dir - -Vector3::unit_z()).magnitude() < 1e-6);
    }

    #[test]
    fn corner_rays_straddle_the_center() {
        let camera = Camera::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::origin(),
            Deg(60.0),
            (64, 64),
        );
        let center = camera.ray_through(32.5, 32.5);
        let corners = camera.corner_rays(32, 32);
        // The corner directions bracket the center direction
        let min_x = corners.iter().map(|r| r.dir.x).fold(1.0, Float::min);
        let max_x = corners.iter().map(|r| r.dir.x).fold(-1.0, Float::max);
        assert!(min_x < center.dir.x && center.dir.x < max_x);
    }
}
