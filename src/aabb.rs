use cgmath::prelude::*;
use cgmath::Point3;

use crate::consts;
use crate::intersect::{Intersect, Ray};
use crate::Float;

pub fn min_point(p1: &Point3<Float>, p2: &Point3<Float>) -> Point3<Float> {
    let mut p_min = Point3::origin();
    for i in 0..3 {
        p_min[i] = p1[i].min(p2[i]);
    }
    p_min
}

pub fn max_point(p1: &Point3<Float>, p2: &Point3<Float>) -> Point3<Float> {
    let mut p_max = Point3::origin();
    for i in 0..3 {
        p_max[i] = p1[i].max(p2[i]);
    }
    p_max
}

#[derive(Clone, Debug)]
pub struct Aabb {
    pub min: Point3<Float>,
    pub max: Point3<Float>,
}

impl Aabb {
    /// Empty box that any added point will replace
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::from_value(consts::MAX),
            max: Point3::from_value(consts::MIN),
        }
    }

    /// Update the bounding box to enclose the new position
    pub fn add_point(&mut self, new_pos: &Point3<Float>) {
        self.min = min_point(&self.min, new_pos);
        self.max = max_point(&self.max, new_pos);
    }

    /// Update the bounding box to enclose other aswell
    pub fn add_aabb(&mut self, other: &Aabb) {
        self.min = min_point(&self.min, &other.min);
        self.max = max_point(&self.max, &other.max);
    }

    pub fn center(&self) -> Point3<Float> {
        Point3::midpoint(self.min, self.max)
    }

    pub fn contains(&self, p: &Point3<Float>, tolerance: Float) -> bool {
        (0..3).all(|i| self.min[i] - tolerance <= p[i] && p[i] <= self.max[i] + tolerance)
    }
}

impl Intersect<'_, Float> for Aabb {
    /// Slab test that returns the entry distance of the ray
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        let mut t_enter: Float = 0.0;
        let mut t_exit = ray.length;
        for i in 0..3 {
            let (near, far) = if ray.neg_dir[i] {
                (self.max[i], self.min[i])
            } else {
                (self.min[i], self.max[i])
            };
            t_enter = t_enter.max((near - ray.orig[i]) * ray.reciprocal_dir[i]);
            t_exit = t_exit.min((far - ray.orig[i]) * ray.reciprocal_dir[i]);
        }
        if t_enter <= t_exit {
            Some(t_enter)
        } else {
            None
        }
    }
}
