use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::bvh::Bvh;
use crate::intersect::{Intersection, Ray};
use crate::triangle::TriangleSoup;
use crate::Float;

/// Distance to the closest forward ray sphere intersection.
/// Prefers the smallest non-negative root of the sphere equation.
pub fn intersect_sphere(
    orig: Point3<Float>,
    dir: Vector3<Float>,
    center: Point3<Float>,
    radius: Float,
) -> Option<Float> {
    debug_assert!((dir.magnitude() - 1.0).abs() < 1e-4);
    let oc = orig - center;
    let a = dir.dot(dir);
    let b = 2.0 * dir.dot(oc);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    if discriminant == 0.0 {
        // Tangent ray with a single root
        let t = -b / (2.0 * a);
        return if t >= 0.0 { Some(t) } else { None };
    }
    let d_sqrt = discriminant.sqrt();
    let t1 = (-b - d_sqrt) / (2.0 * a);
    let t2 = (-b + d_sqrt) / (2.0 * a);
    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Distance to the closest forward ray plane intersection
pub fn intersect_plane(
    orig: Point3<Float>,
    dir: Vector3<Float>,
    center: Point3<Float>,
    normal: Vector3<Float>,
) -> Option<Float> {
    let denom = dir.dot(normal);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (center - orig).dot(normal) / denom;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Triangle mesh with its acceleration structure
pub struct Mesh {
    pub soup: TriangleSoup,
    pub bvh: Bvh,
}

impl Mesh {
    pub fn new(soup: TriangleSoup) -> Mesh {
        let bvh = Bvh::build(&soup);
        Mesh { soup, bvh }
    }
}

/// The closed set of traceable shapes
pub enum Geometry {
    Sphere {
        center: Point3<Float>,
        radius: Float,
    },
    Plane {
        center: Point3<Float>,
        normal: Vector3<Float>,
    },
    Mesh(Mesh),
}

impl Geometry {
    pub fn sphere(center: Point3<Float>, radius: Float) -> Geometry {
        Geometry::Sphere { center, radius }
    }

    pub fn plane(center: Point3<Float>, normal: Vector3<Float>) -> Geometry {
        Geometry::Plane {
            center,
            normal: normal.normalize(),
        }
    }

    pub fn mesh(soup: TriangleSoup) -> Geometry {
        Geometry::Mesh(Mesh::new(soup))
    }

    /// Update the intersection if this shape has a strictly closer forward
    /// hit within the ray length. Returns true if the ray hit the shape.
    pub fn intersect(&self, ray: &Ray, isect: &mut Intersection) -> bool {
        match self {
            Geometry::Sphere { center, radius } => {
                if let Some(t) = intersect_sphere(ray.orig, ray.dir, *center, *radius) {
                    if t < ray.length {
                        if t < isect.t {
                            isect.t = t;
                            isect.position = ray.point_at(t);
                            isect.normal = (isect.position - *center) / *radius;
                            isect.shading_normal = isect.normal;
                        }
                        return true;
                    }
                }
                false
            }
            Geometry::Plane { center, normal } => {
                if let Some(t) = intersect_plane(ray.orig, ray.dir, *center, *normal) {
                    if t < ray.length {
                        if t < isect.t {
                            isect.t = t;
                            isect.position = ray.point_at(t);
                            isect.normal = *normal;
                            isect.shading_normal = *normal;
                        }
                        return true;
                    }
                }
                false
            }
            Geometry::Mesh(mesh) => mesh.bvh.intersect(&mesh.soup, ray, isect),
        }
    }
}
