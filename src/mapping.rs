use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector2, Vector3};

use crate::consts;
use crate::intersect::Intersection;
use crate::Float;

/// Transform a tangent space direction to world space.
/// The output is normalized even if the input is not.
pub fn tangent_to_world(
    d: Vector3<Float>,
    normal: Vector3<Float>,
    tangent: Vector3<Float>,
    bitangent: Vector3<Float>,
) -> Vector3<Float> {
    (d.x * tangent + d.y * bitangent + d.z * normal).normalize()
}

/// Orthonormal tangent and bitangent for an arbitrary normal
fn orthonormal_frame(normal: Vector3<Float>) -> (Vector3<Float>, Vector3<Float>) {
    let bitangent = if normal.x.abs() > normal.z.abs() {
        Vector3::new(-normal.y, normal.x, 0.0)
    } else {
        Vector3::new(0.0, -normal.z, normal.y)
    }
    .normalize();
    let tangent = bitangent.cross(normal);
    (tangent, bitangent)
}

/// The closed set of uv parametrizations
pub enum TextureMapping {
    Spherical {
        center: Point3<Float>,
        scale_uv: Vector2<Float>,
    },
    Planar {
        center: Point3<Float>,
        tangent: Vector3<Float>,
        bitangent: Vector3<Float>,
        scale_uv: Vector2<Float>,
    },
    /// Uv coordinates interpolated from mesh vertices
    Vertex,
}

impl TextureMapping {
    pub fn spherical(center: Point3<Float>, scale_uv: Vector2<Float>) -> TextureMapping {
        TextureMapping::Spherical { center, scale_uv }
    }

    pub fn planar(
        center: Point3<Float>,
        tangent: Vector3<Float>,
        bitangent: Vector3<Float>,
        scale_uv: Vector2<Float>,
    ) -> TextureMapping {
        TextureMapping::Planar {
            center,
            tangent: tangent.normalize(),
            bitangent: bitangent.normalize(),
            scale_uv,
        }
    }

    /// Uv coordinate of the intersection position
    pub fn uv(&self, isect: &Intersection) -> Point2<Float> {
        match self {
            TextureMapping::Spherical { center, scale_uv } => {
                let d = (isect.position - *center).normalize();
                let u = 0.5 + d.z.atan2(d.x) / (2.0 * consts::PI);
                let v = 0.5 - d.y.max(-1.0).min(1.0).asin() / consts::PI;
                Point2::new(u * scale_uv.x, v * scale_uv.y)
            }
            TextureMapping::Planar {
                center,
                tangent,
                bitangent,
                scale_uv,
            } => {
                let rel = isect.position - *center;
                Point2::new(
                    rel.dot(*tangent) * scale_uv.x,
                    rel.dot(*bitangent) * scale_uv.y,
                )
            }
            TextureMapping::Vertex => isect.uv,
        }
    }

    /// Tangent frame used to orient tangent space normals
    pub fn tangent_frame(&self, isect: &Intersection) -> (Vector3<Float>, Vector3<Float>) {
        match self {
            TextureMapping::Spherical { center, .. } => {
                let d = (isect.position - *center).normalize();
                // East pointing surface tangent, degenerate at the poles
                let tangent = Vector3::new(-d.z, 0.0, d.x);
                if tangent.magnitude2() < 1e-12 {
                    orthonormal_frame(isect.shading_normal)
                } else {
                    let tangent = tangent.normalize();
                    let bitangent = isect.shading_normal.cross(tangent);
                    (tangent, bitangent)
                }
            }
            TextureMapping::Planar {
                tangent, bitangent, ..
            } => (*tangent, *bitangent),
            TextureMapping::Vertex => orthonormal_frame(isect.shading_normal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{vec2, Point3};

    fn isect_at(position: Point3<Float>) -> Intersection {
        let mut isect = Intersection::none();
        isect.position = position;
        isect
    }

    #[test]
    fn planar_uv_is_measured_along_the_tangents() {
        let mapping = TextureMapping::planar(
            Point3::origin(),
            Vector3::unit_x(),
            Vector3::unit_z(),
            vec2(0.5, 0.5),
        );
        let uv = mapping.uv(&isect_at(Point3::new(2.0, 0.0, 4.0)));
        assert!((uv.x - 1.0).abs() < 1e-9);
        assert!((uv.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn spherical_uv_covers_the_unit_square() {
        let mapping = TextureMapping::spherical(Point3::origin(), vec2(1.0, 1.0));
        // North pole maps to v = 0, equator to v = 0.5
        let uv = mapping.uv(&isect_at(Point3::new(0.0, 1.0, 0.0)));
        assert!(uv.y.abs() < 1e-9);
        let uv = mapping.uv(&isect_at(Point3::new(1.0, 0.0, 0.0)));
        assert!((uv.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn tangent_to_world_maps_unit_z_to_the_normal() {
        let normal = Vector3::new(1.0, 2.0, -0.5).normalize();
        let (tangent, bitangent) = orthonormal_frame(normal);
        let mapped = tangent_to_world(Vector3::unit_z(), normal, tangent, bitangent);
        assert!((mapped - normal).magnitude() < 1e-9);
        // The frame is orthonormal
        assert!(tangent.dot(bitangent).abs() < 1e-9);
        assert!(tangent.dot(normal).abs() < 1e-9);
        assert!((tangent.magnitude() - 1.0).abs() < 1e-9);
    }
}
