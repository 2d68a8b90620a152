use cgmath::prelude::*;
use cgmath::{Point2, Point3, Vector2};

use crate::color::Color;
use crate::config::RenderConfig;
use crate::geometry::{self, Geometry};
use crate::intersect::{Intersection, Ray};
use crate::light::Light;
use crate::mapping::{self, TextureMapping};
use crate::material::Material;
use crate::Float;

/// Traceable object tying a shape to its parametrization and material
pub struct Object {
    pub geometry: Geometry,
    pub mapping: TextureMapping,
    pub material: Material,
}

impl Object {
    pub fn new(geometry: Geometry, mapping: TextureMapping, material: Material) -> Object {
        Object {
            geometry,
            mapping,
            material,
        }
    }

    /// Resolve uv, footprint, material sample and shading normal
    /// for an intersection with this object.
    pub fn compute_shading_info(
        &self,
        isect: &mut Intersection,
        corner_rays: Option<&[Ray; 4]>,
        config: &RenderConfig,
    ) {
        isect.uv = self.mapping.uv(isect);
        isect.dudv = match corner_rays {
            Some(rays) => self.compute_uv_aabb_size(rays, isect),
            None => Vector2::zero(),
        };
        isect.material = self.material.evaluate(isect.uv, isect.dudv, config);
        let (tangent, bitangent) = self.mapping.tangent_frame(isect);
        isect.shading_normal = mapping::tangent_to_world(
            isect.material.normal,
            isect.shading_normal,
            tangent,
            bitangent,
        );
    }

    /// Uv coordinates of the corner positions.
    /// Corner pairs that land on the same side of the center uv are
    /// mirrored so footprints across a wrap seam stay small.
    fn intersection_uvs(
        &self,
        positions: &[Point3<Float>; 4],
        isect: &Intersection,
    ) -> [Point2<Float>; 4] {
        let mut uvs = [isect.uv; 4];
        for (uv, position) in uvs.iter_mut().zip(positions.iter()) {
            let mut corner = isect.clone();
            corner.position = *position;
            *uv = self.mapping.uv(&corner);
        }
        for k in 0..2 {
            let duvs = [uvs[2 * k] - isect.uv, uvs[2 * k + 1] - isect.uv];
            if duvs[0].dot(duvs[1]) > 0.0 {
                let m = if duvs[0].magnitude2() < duvs[1].magnitude2() {
                    0
                } else {
                    1
                };
                uvs[2 * k] = isect.uv + duvs[m];
                uvs[2 * k + 1] = isect.uv - duvs[m];
            }
        }
        uvs
    }

    /// Size of the pixel footprint in uv space.
    /// The corner rays are intersected with the tangent plane at the hit
    /// and the extents of the projected uv coordinates are returned.
    pub fn compute_uv_aabb_size(&self, rays: &[Ray; 4], isect: &Intersection) -> Vector2<Float> {
        if let TextureMapping::Vertex = self.mapping {
            // Vertex uvs cannot be re-evaluated at the corner positions
            return Vector2::zero();
        }
        let mut positions = [isect.position; 4];
        for (position, ray) in positions.iter_mut().zip(rays.iter()) {
            if let Some(t) =
                geometry::intersect_plane(ray.orig, ray.dir, isect.position, isect.normal)
            {
                *position = ray.point_at(t);
            }
        }
        let uvs = self.intersection_uvs(&positions, isect);
        let mut min_uv = isect.uv;
        let mut max_uv = isect.uv;
        for uv in &uvs {
            min_uv = Point2::new(min_uv.x.min(uv.x), min_uv.y.min(uv.y));
            max_uv = Point2::new(max_uv.x.max(uv.x), max_uv.y.max(uv.y));
        }
        max_uv - min_uv
    }
}

/// Scene holding everything the tracer can see
pub struct Scene {
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,
    pub background: Color,
}

impl Scene {
    pub fn new(objects: Vec<Object>, lights: Vec<Light>, background: Color) -> Scene {
        Scene {
            objects,
            lights,
            background,
        }
    }

    /// Find the nearest intersection along the ray.
    /// Shading info is resolved only on the winning object.
    pub fn intersect(
        &self,
        ray: &Ray,
        corner_rays: Option<&[Ray; 4]>,
        config: &RenderConfig,
    ) -> Option<Intersection> {
        let mut isect = Intersection::none();
        let mut hit_i = None;
        for (i, object) in self.objects.iter().enumerate() {
            let t_before = isect.t;
            object.geometry.intersect(ray, &mut isect);
            if isect.t < t_before {
                hit_i = Some(i);
            }
        }
        let object = &self.objects[hit_i?];
        object.compute_shading_info(&mut isect, corner_rays, config);
        Some(isect)
    }

    /// Test if anything blocks the ray before its full length
    pub fn intersect_shadow(&self, ray: &Ray) -> bool {
        let mut isect = Intersection::none();
        isect.t = ray.length;
        self.objects
            .iter()
            .any(|object| object.geometry.intersect(ray, &mut isect))
    }

    /// Test mutual visibility of two points
    pub fn visible(&self, p: Point3<Float>, q: Point3<Float>, epsilon: Float) -> bool {
        let ray = Ray::shadow(p, q, epsilon);
        !self.intersect_shadow(&ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use cgmath::{vec2, Vector3};

    fn two_sphere_scene() -> Scene {
        let near = Object::new(
            Geometry::sphere(Point3::new(0.0, 0.0, 2.0), 0.5),
            TextureMapping::spherical(Point3::new(0.0, 0.0, 2.0), vec2(1.0, 1.0)),
            Material::diffuse(Texture::from_color(Color::new(1.0, 0.0, 0.0))),
        );
        let far = Object::new(
            Geometry::sphere(Point3::new(0.0, 0.0, 6.0), 0.5),
            TextureMapping::spherical(Point3::new(0.0, 0.0, 6.0), vec2(1.0, 1.0)),
            Material::diffuse(Texture::from_color(Color::new(0.0, 1.0, 0.0))),
        );
        Scene::new(vec![near, far], Vec::new(), Color::black())
    }

    #[test]
    fn nearest_object_wins() {
        let scene = two_sphere_scene();
        let config = RenderConfig::default();
        let ray = Ray::from_dir(Point3::origin(), Vector3::unit_z());
        let isect = scene.intersect(&ray, None, &config).unwrap();
        assert!((isect.t - 1.5).abs() < 1e-6);
        // The material belongs to the nearer sphere
        assert_eq!(isect.material.k_d, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn miss_returns_none() {
        let scene = two_sphere_scene();
        let config = RenderConfig::default();
        let ray = Ray::from_dir(Point3::origin(), Vector3::unit_y());
        assert!(scene.intersect(&ray, None, &config).is_none());
    }

    #[test]
    fn occluded_points_are_not_visible() {
        let scene = two_sphere_scene();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let behind = Point3::new(0.0, 0.0, 4.0);
        let beside = Point3::new(0.0, 4.0, 0.0);
        assert!(!scene.visible(origin, behind, 1e-6));
        assert!(scene.visible(origin, beside, 1e-6));
    }
}
