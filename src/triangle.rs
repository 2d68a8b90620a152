use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector3};

use crate::aabb::Aabb;
use crate::intersect::{Intersection, Ray};
use crate::Float;

/// Flat triangle soup with three vertices per triangle.
/// The vertex order defines the triangles and never changes;
/// acceleration structures permute an index array instead.
#[derive(Clone, Debug, Default)]
pub struct TriangleSoup {
    positions: Vec<Point3<Float>>,
    normals: Vec<Vector3<Float>>,
    tex_coords: Vec<Point2<Float>>,
}

impl TriangleSoup {
    pub fn new() -> TriangleSoup {
        TriangleSoup::default()
    }

    /// Add a triangle with smooth vertex normals
    pub fn push_triangle(
        &mut self,
        positions: [Point3<Float>; 3],
        normals: [Vector3<Float>; 3],
        tex_coords: [Point2<Float>; 3],
    ) {
        self.positions.extend_from_slice(&positions);
        self.normals.extend_from_slice(&normals);
        self.tex_coords.extend_from_slice(&tex_coords);
    }

    /// Add a triangle that uses the planar normal for every vertex
    pub fn push_flat_triangle(
        &mut self,
        positions: [Point3<Float>; 3],
        tex_coords: [Point2<Float>; 3],
    ) {
        let ng = (positions[1] - positions[0])
            .cross(positions[2] - positions[0])
            .normalize();
        self.push_triangle(positions, [ng, ng, ng], tex_coords);
    }

    pub fn num_triangles(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex(&self, tri: usize, i: usize) -> Point3<Float> {
        self.positions[3 * tri + i]
    }

    pub fn aabb(&self, tri: usize) -> Aabb {
        let mut aabb = Aabb::empty();
        for i in 0..3 {
            aabb.add_point(&self.vertex(tri, i));
        }
        aabb
    }

    /// Möller-Trumbore intersection test.
    /// Returns the hit distance and barycentric coordinates of the
    /// closest forward intersection within the ray length.
    pub fn intersect_triangle(&self, ray: &Ray, tri: usize) -> Option<(Float, Float, Float)> {
        let p0 = self.vertex(tri, 0);
        let e1 = self.vertex(tri, 1) - p0;
        let e2 = self.vertex(tri, 2) - p0;
        let pv = ray.dir.cross(e2);
        let det = e1.dot(pv);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tv = ray.orig - p0;
        let u = tv.dot(pv) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qv = tv.cross(e1);
        let v = ray.dir.dot(qv) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(qv) * inv_det;
        if t > 0.0 && t < ray.length {
            Some((t, u, v))
        } else {
            None
        }
    }

    /// Fill the intersection with barycentrically interpolated shading data
    pub fn fill_intersection(
        &self,
        isect: &mut Intersection,
        tri: usize,
        t: Float,
        u: Float,
        v: Float,
    ) {
        let b0 = 1.0 - u - v;
        let p0 = self.vertex(tri, 0);
        let p1 = self.vertex(tri, 1);
        let p2 = self.vertex(tri, 2);
        isect.t = t;
        isect.bary = Vector3::new(b0, u, v);
        isect.position = b0 * p0 + u * p1.to_vec() + v * p2.to_vec();
        isect.normal = (p1 - p0).cross(p2 - p0).normalize();
        isect.shading_normal = (b0 * self.normals[3 * tri]
            + u * self.normals[3 * tri + 1]
            + v * self.normals[3 * tri + 2])
            .normalize();
        let t0 = self.tex_coords[3 * tri];
        let t1 = self.tex_coords[3 * tri + 1];
        let t2 = self.tex_coords[3 * tri + 2];
        isect.uv = b0 * t0 + u * t1.to_vec() + v * t2.to_vec();
    }
}
