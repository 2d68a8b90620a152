use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::config::RenderConfig;
use crate::intersect::Ray;
use crate::material::MaterialSample;
use crate::scene::Scene;
use crate::Float;

/// Mirror reflection of v around n.
/// Both v and the result point away from the surface.
pub fn reflect(v: Vector3<Float>, n: Vector3<Float>) -> Vector3<Float> {
    2.0 * n.dot(v) * n - v
}

/// Refracted direction for a view vector v pointing away from the surface.
/// The material index eta_mat is relative to the surrounding medium.
/// Returns None on total internal reflection.
pub fn refract(v: Vector3<Float>, n: Vector3<Float>, eta_mat: Float) -> Option<Vector3<Float>> {
    let mut cos_i = n.dot(v);
    // Determine if v is entering or exiting the material
    let (n, eta) = if cos_i > 0.0 {
        (n, 1.0 / eta_mat)
    } else {
        cos_i = -cos_i;
        (-n, eta_mat)
    };
    let sin2_i = (1.0 - cos_i.powi(2)).max(0.0);
    let sin2_t = eta.powi(2) * sin2_i;
    // Total internal reflection
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(-v * eta + (eta * cos_i - cos_t) * n)
}

/// Fresnel reflectance of a dielectric interface for the view vector v
pub fn fresnel(v: Vector3<Float>, n: Vector3<Float>, eta_mat: Float) -> Float {
    let mut cos_i = n.dot(v);
    let (eta_i, eta_t) = if cos_i > 0.0 {
        (1.0, eta_mat)
    } else {
        cos_i = -cos_i;
        (eta_mat, 1.0)
    };
    let sin2_i = (1.0 - cos_i.powi(2)).max(0.0);
    let sin2_t = (eta_i / eta_t).powi(2) * sin2_i;
    // Total internal reflection
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    let paral = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (paral.powi(2) + perp.powi(2)) / 2.0
}

/// Trace a ray and return the reflected radiance.
/// Recursion stops once depth exceeds the configured maximum or the
/// ray leaves the scene.
pub fn trace_recursive(
    scene: &Scene,
    ray: &Ray,
    corner_rays: Option<&[Ray; 4]>,
    depth: usize,
    config: &RenderConfig,
) -> Color {
    if depth > config.max_depth {
        return Color::black();
    }
    let isect = match scene.intersect(ray, corner_rays, config) {
        Some(isect) => isect,
        None => return scene.background,
    };
    let mat = isect.material;
    let p = isect.position;
    let n = isect.shading_normal;
    let v = -ray.dir;
    let mut radiance = evaluate_phong(scene, &mat, p, n, v, config);
    if mat.is_transmissive() {
        if config.transmission {
            radiance += evaluate_transmissive(scene, depth, p, n, v, mat.eta_of_channel, config);
        }
    } else if config.reflection && !mat.k_s.is_black() {
        radiance += mat.k_s * evaluate_reflection(scene, depth, p, n, v, config);
    }
    radiance
}

/// Direct lighting with the phong reflection model
pub fn evaluate_phong(
    scene: &Scene,
    mat: &MaterialSample,
    p: Point3<Float>,
    n: Vector3<Float>,
    v: Vector3<Float>,
    config: &RenderConfig,
) -> Color {
    debug_assert!((n.magnitude() - 1.0).abs() < 1e-4);
    debug_assert!((v.magnitude() - 1.0).abs() < 1e-4);
    let mut contribution = Color::black();
    for light in &scene.lights {
        let light_pos = light.position();
        let dp = light_pos - p;
        let dist2 = dp.magnitude2();
        let l = dp / dist2.sqrt();

        let visibility = if config.shadows && !scene.visible(p, light_pos, config.ray_epsilon) {
            0.0
        } else {
            1.0
        };

        // Incident radiance attenuated by the inverse square distance,
        // zero for lights behind the surface
        let cos_theta = n.dot(l);
        let incident = if cos_theta > 0.0 {
            light.emission(-l) * (visibility / dist2)
        } else {
            Color::black()
        };

        if config.diffuse {
            contribution += incident * mat.k_d * cos_theta.max(0.0);
        }
        if config.specular {
            let r_l = 2.0 * cos_theta * n - l;
            let cos_psi = r_l.dot(v).max(0.0);
            contribution += incident * mat.k_s * cos_psi.powf(mat.n);
        }
        if config.ambient {
            contribution += light.power() * mat.k_a * (1.0 / dist2);
        }
    }
    contribution
}

/// Radiance arriving along the mirror direction
fn evaluate_reflection(
    scene: &Scene,
    depth: usize,
    p: Point3<Float>,
    n: Vector3<Float>,
    v: Vector3<Float>,
    config: &RenderConfig,
) -> Color {
    let r = reflect(v, n);
    let ray = Ray::from_dir(p + config.ray_epsilon * r, r);
    trace_recursive(scene, &ray, None, depth + 1, config)
}

/// Radiance arriving along the refracted direction,
/// zero on total internal reflection
fn evaluate_transmission(
    scene: &Scene,
    depth: usize,
    p: Point3<Float>,
    n: Vector3<Float>,
    v: Vector3<Float>,
    eta: Float,
    config: &RenderConfig,
) -> Color {
    let t = match refract(v, n, eta) {
        Some(t) => t,
        None => return Color::black(),
    };
    let ray = Ray::from_dir(p + config.ray_epsilon * t, t);
    trace_recursive(scene, &ray, None, depth + 1, config)
}

fn transmissive_single_ior(
    scene: &Scene,
    depth: usize,
    p: Point3<Float>,
    n: Vector3<Float>,
    v: Vector3<Float>,
    eta: Float,
    config: &RenderConfig,
) -> Color {
    if config.fresnel {
        let fr = fresnel(v, n, eta);
        fr * evaluate_reflection(scene, depth, p, n, v, config)
            + (1.0 - fr) * evaluate_transmission(scene, depth, p, n, v, eta, config)
    } else {
        evaluate_transmission(scene, depth, p, n, v, eta, config)
    }
}

/// Transmission through a dielectric.
/// With dispersion enabled and differing channel indices every color
/// channel is traced separately with its own index of refraction.
fn evaluate_transmissive(
    scene: &Scene,
    depth: usize,
    p: Point3<Float>,
    n: Vector3<Float>,
    v: Vector3<Float>,
    eta_of_channel: [Float; 3],
    config: &RenderConfig,
) -> Color {
    let uniform =
        eta_of_channel[0] == eta_of_channel[1] && eta_of_channel[0] == eta_of_channel[2];
    if config.dispersion && !uniform {
        let mut contribution = Color::black();
        for channel in 0..3 {
            let traced =
                transmissive_single_ior(scene, depth, p, n, v, eta_of_channel[channel], config);
            contribution[channel] = traced[channel];
        }
        contribution
    } else {
        let eta = (eta_of_channel[0] + eta_of_channel[1] + eta_of_channel[2]) / 3.0;
        transmissive_single_ior(scene, depth, p, n, v, eta, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::light::Light;
    use crate::mapping::TextureMapping;
    use crate::material::Material;
    use crate::scene::Object;
    use crate::texture::Texture;

    use cgmath::vec2;

    fn diffuse_only_config() -> RenderConfig {
        RenderConfig {
            shadows: false,
            ambient: false,
            diffuse: true,
            specular: false,
            reflection: false,
            transmission: false,
            fresnel: false,
            dispersion: false,
            ..RenderConfig::default()
        }
    }

    fn single_sphere_scene(material: Material) -> Scene {
        let sphere = Object::new(
            Geometry::sphere(Point3::origin(), 1.0),
            TextureMapping::spherical(Point3::origin(), vec2(1.0, 1.0)),
            material,
        );
        let light = Light::point(Point3::new(0.0, 0.0, 5.0), Color::white());
        Scene::new(vec![sphere], vec![light], Color::black())
    }

    #[test]
    fn reflect_mirrors_around_the_normal() {
        let v = Vector3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect(v, Vector3::unit_y());
        let expected = Vector3::new(-1.0, 1.0, 0.0).normalize();
        assert!((r - expected).magnitude() < 1e-9);
        // Normal incidence reflects straight back
        let r = reflect(Vector3::unit_y(), Vector3::unit_y());
        assert!((r - Vector3::unit_y()).magnitude() < 1e-9);
    }

    #[test]
    fn refract_passes_straight_through_at_normal_incidence() {
        let t = refract(Vector3::unit_z(), Vector3::unit_z(), 1.5).unwrap();
        assert!((t - -Vector3::unit_z()).magnitude() < 1e-9);
    }

    #[test]
    fn refract_bends_towards_the_normal_when_entering() {
        let v = Vector3::new(1.0, 1.0, 0.0).normalize();
        let t = refract(v, Vector3::unit_y(), 1.5).unwrap();
        // Snell: sin_t = sin_i / 1.5
        let sin_t = (v.x / 1.5).abs();
        assert!((t.x.abs() - sin_t).abs() < 1e-9);
        assert!(t.y < 0.0);
        assert!((t.magnitude() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn refract_reports_total_internal_reflection() {
        // Exiting a dense medium beyond the critical angle
        let v = Vector3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(v, Vector3::unit_y(), 1.5).is_none());
        assert_eq!(fresnel(v, Vector3::unit_y(), 1.5), 1.0);
    }

    #[test]
    fn fresnel_at_normal_incidence_matches_the_closed_form() {
        // ((eta - 1) / (eta + 1))^2 = 0.04 for glass
        let fr = fresnel(Vector3::unit_y(), Vector3::unit_y(), 1.5);
        assert!((fr - 0.04).abs() < 1e-9);
        // Same from inside the material
        let fr = fresnel(-Vector3::unit_y(), Vector3::unit_y(), 1.5);
        assert!((fr - 0.04).abs() < 1e-9);
    }

    #[test]
    fn diffuse_sphere_radiance_matches_the_phong_model() {
        let k_d = 0.6;
        let scene = single_sphere_scene(Material::diffuse(Texture::from_color(Color::new(
            k_d, k_d, k_d,
        ))));
        let config = diffuse_only_config();
        let ray = Ray::from_dir(Point3::new(0.0, 0.0, 3.0), -Vector3::unit_z());
        let c = trace_recursive(&scene, &ray, None, 0, &config);
        // The hit point faces the light head on at distance 4
        let expected = k_d / 16.0;
        for i in 0..3 {
            assert!(
                (c[i] - expected).abs() < 1e-6,
                "Got {} but expected {}",
                c[i],
                expected
            );
        }
    }

    #[test]
    fn depth_limit_terminates_the_recursion() {
        let scene = single_sphere_scene(Material::diffuse(Texture::from_color(Color::white())));
        let config = diffuse_only_config();
        let ray = Ray::from_dir(Point3::new(0.0, 0.0, 3.0), -Vector3::unit_z());
        let c = trace_recursive(&scene, &ray, None, config.max_depth + 1, &config);
        assert!(c.is_black());
    }

    #[test]
    fn missing_rays_return_the_background() {
        let mut scene = single_sphere_scene(Material::diffuse(Texture::from_color(Color::white())));
        scene.background = Color::new(0.1, 0.2, 0.3);
        let config = diffuse_only_config();
        let ray = Ray::from_dir(Point3::new(0.0, 0.0, 3.0), Vector3::unit_y());
        assert_eq!(
            trace_recursive(&scene, &ray, None, 0, &config),
            scene.background
        );
    }

    #[test]
    fn shadowed_point_receives_no_direct_light() {
        let mut scene = single_sphere_scene(Material::diffuse(Texture::from_color(Color::white())));
        // Blocker between the light and the sphere
        scene.objects.push(Object::new(
            Geometry::sphere(Point3::new(0.0, 0.0, 3.0), 0.5),
            TextureMapping::spherical(Point3::new(0.0, 0.0, 3.0), vec2(1.0, 1.0)),
            Material::diffuse(Texture::from_color(Color::white())),
        ));
        let config = RenderConfig {
            shadows: true,
            ..diffuse_only_config()
        };
        // Shade the lit pole of the big sphere directly
        let mat = MaterialSample {
            k_d: Color::white(),
            ..MaterialSample::none()
        };
        let c = evaluate_phong(
            &scene,
            &mat,
            Point3::new(0.0, 0.0, 1.0),
            Vector3::unit_z(),
            Vector3::unit_z(),
            &config,
        );
        assert!(c.is_black());
    }

    #[test]
    fn dispersion_splits_the_channels() {
        // A plane orthogonal to the ray so refraction keeps the direction,
        // behind it a colored wall provides the radiance
        let glass = Object::new(
            Geometry::plane(Point3::new(0.0, 0.0, 1.0), Vector3::unit_z()),
            TextureMapping::planar(
                Point3::new(0.0, 0.0, 1.0),
                Vector3::unit_x(),
                Vector3::unit_y(),
                vec2(1.0, 1.0),
            ),
            Material::transmissive([1.1, 1.3, 1.5]),
        );
        let wall_color = Color::new(0.2, 0.4, 0.8);
        let wall = Object::new(
            Geometry::plane(Point3::new(0.0, 0.0, -1.0), Vector3::unit_z()),
            TextureMapping::planar(
                Point3::new(0.0, 0.0, -1.0),
                Vector3::unit_x(),
                Vector3::unit_y(),
                vec2(1.0, 1.0),
            ),
            Material::diffuse(Texture::from_color(wall_color)),
        );
        let light = Light::point(Point3::new(0.0, 0.0, 0.0), Color::white());
        let scene = Scene::new(vec![glass, wall], vec![light], Color::black());
        let config = RenderConfig {
            transmission: true,
            dispersion: true,
            shadows: false,
            ..diffuse_only_config()
        };
        let ray = Ray::from_dir(Point3::new(0.0, 0.0, 3.0), -Vector3::unit_z());
        let c = trace_recursive(&scene, &ray, None, 0, &config);
        // Every channel makes it through the orthogonal interface
        for i in 0..3 {
            assert!(c[i] > 0.0);
        }
        // The channel ratios match the wall color
        assert!((c[1] / c[0] - wall_color[1] / wall_color[0]).abs() < 1e-6);
    }
}
