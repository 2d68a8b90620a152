use std::sync::atomic::{AtomicUsize, Ordering};

use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector2, Vector3};

use crate::consts;
use crate::material::MaterialSample;
use crate::Float;

static RAY_COUNT: AtomicUsize = AtomicUsize::new(0);

pub trait Intersect<'a, H> {
    fn intersect(&'a self, ray: &Ray) -> Option<H>;
}

#[derive(Clone, Debug)]
pub struct Ray {
    pub orig: Point3<Float>,
    pub dir: Vector3<Float>,
    pub length: Float,
    // For more efficient ray box intersections
    pub reciprocal_dir: Vector3<Float>,
    pub neg_dir: [bool; 3],
}

impl Ray {
    fn new(orig: Point3<Float>, dir: Vector3<Float>, length: Float) -> Ray {
        debug_assert!(
            (dir.magnitude() - 1.0).abs() < 1e-4,
            "Ray direction is not normalized!"
        );
        RAY_COUNT.fetch_add(1, Ordering::Relaxed);
        let reciprocal_dir = 1.0 / dir;
        let neg_dir = [dir.x < 0.0, dir.y < 0.0, dir.z < 0.0];
        Ray {
            orig,
            dir,
            length,
            reciprocal_dir,
            neg_dir,
        }
    }

    /// Infinite ray with a given direction and origin
    pub fn from_dir(mut orig: Point3<Float>, dir: Vector3<Float>) -> Ray {
        orig += consts::EPSILON * dir;
        Ray::new(orig, dir, consts::INFINITY)
    }

    /// Infinite ray from origin towards another point
    pub fn from_point(mut orig: Point3<Float>, to: Point3<Float>) -> Ray {
        let dir = (to - orig).normalize();
        orig += consts::EPSILON * dir;
        Ray::new(orig, dir, consts::INFINITY)
    }

    /// Shadow ray between two points
    pub fn shadow(mut orig: Point3<Float>, to: Point3<Float>, epsilon: Float) -> Ray {
        let dp = to - orig;
        let length = dp.magnitude() - 2.0 * epsilon;
        let dir = dp.normalize();
        orig += epsilon * dir;
        Ray::new(orig, dir, length)
    }

    pub fn point_at(&self, t: Float) -> Point3<Float> {
        self.orig + t * self.dir
    }

    pub fn reset_count() {
        RAY_COUNT.store(0, Ordering::Relaxed);
    }

    pub fn count() -> usize {
        RAY_COUNT.load(Ordering::Relaxed)
    }
}

/// Shading information for the closest hit found so far.
/// Overwritten in place whenever a query finds a strictly closer hit.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub t: Float,
    pub position: Point3<Float>,
    /// Geometric normal
    pub normal: Vector3<Float>,
    /// Interpolated and possibly normal mapped normal
    pub shading_normal: Vector3<Float>,
    pub uv: Point2<Float>,
    /// Size of the pixel footprint in uv space
    pub dudv: Vector2<Float>,
    /// Barycentric coordinates of triangle hits
    pub bary: Vector3<Float>,
    pub material: MaterialSample,
}

impl Intersection {
    /// Empty intersection that any forward hit will replace
    pub fn none() -> Intersection {
        Intersection {
            t: consts::INFINITY,
            position: Point3::origin(),
            normal: Vector3::unit_z(),
            shading_normal: Vector3::unit_z(),
            uv: Point2::origin(),
            dudv: Vector2::zero(),
            bary: Vector3::zero(),
            material: MaterialSample::none(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.t < consts::INFINITY
    }
}
