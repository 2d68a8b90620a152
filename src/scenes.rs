use cgmath::{vec2, Deg, Point2, Point3, Vector3};

use crate::camera::Camera;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::consts;
use crate::float::*;
use crate::geometry::Geometry;
use crate::light::Light;
use crate::mapping::TextureMapping;
use crate::material::Material;
use crate::scene::{Object, Scene};
use crate::texture::{Image, NormalMap, Texture};
use crate::triangle::TriangleSoup;

/// Built in demo scenes rendered by the offline binary
pub fn demo_scenes() -> Vec<(&'static str, fn(&RenderConfig) -> (Scene, Camera))> {
    vec![
        ("phong_spheres", phong_spheres),
        ("glass_sphere", glass_sphere),
        ("cube_mesh", cube_mesh),
    ]
}

fn checkerboard(size: usize, squares: usize, bright: Color, dark: Color) -> Texture {
    let square = (size / squares).max(1);
    Texture::from_image(Image::from_fn(size, size, |x, y| {
        if (x / square + y / square) % 2 == 0 {
            bright
        } else {
            dark
        }
    }))
}

/// Gentle sine ripples encoded as a tangent space normal map
fn ripple_normal_map(size: usize) -> NormalMap {
    NormalMap::from_image(Image::from_fn(size, size, |x, y| {
        let phase = 8.0 * consts::PI * x.to_float() / size.to_float();
        let dx = 0.2 * phase.sin() * (y.to_float() / size.to_float());
        let n = Vector3::new(-dx, 0.0, 1.0) / (1.0 + dx * dx).sqrt();
        Color::new(0.5 * n.x + 0.5, 0.5 * n.y + 0.5, 0.5 * n.z + 0.5)
    }))
}

fn floor(material: Material) -> Object {
    let center = Point3::new(0.0, -1.0, 0.0);
    Object::new(
        Geometry::plane(center, Vector3::unit_y()),
        TextureMapping::planar(center, Vector3::unit_x(), Vector3::unit_z(), vec2(0.25, 0.25)),
        material,
    )
}

fn camera(config: &RenderConfig, pos: Point3<Float>, look_at: Point3<Float>) -> Camera {
    Camera::new(pos, look_at, Deg(60.0), (config.width, config.height))
}

/// Two spheres lit by a spotlight and a point light
fn phong_spheres(config: &RenderConfig) -> (Scene, Camera) {
    let floor_material = Material::diffuse(checkerboard(
        128,
        8,
        Color::new(0.8, 0.8, 0.8),
        Color::new(0.15, 0.15, 0.2),
    ))
    .with_ambient(Texture::from_color(Color::new(0.05, 0.05, 0.05)))
    .with_normal_map(ripple_normal_map(128));
    let red = Object::new(
        Geometry::sphere(Point3::new(-1.2, 0.0, 0.0), 1.0),
        TextureMapping::spherical(Point3::new(-1.2, 0.0, 0.0), vec2(1.0, 1.0)),
        Material::diffuse(Texture::from_color(Color::new(0.7, 0.1, 0.1)))
            .with_ambient(Texture::from_color(Color::new(0.07, 0.01, 0.01))),
    );
    let mirror = Object::new(
        Geometry::sphere(Point3::new(1.2, 0.0, 0.0), 1.0),
        TextureMapping::spherical(Point3::new(1.2, 0.0, 0.0), vec2(1.0, 1.0)),
        Material::glossy(
            Texture::from_color(Color::new(0.05, 0.1, 0.05)),
            Texture::from_color(Color::new(0.8, 0.8, 0.8)),
            80.0,
        ),
    );
    let lights = vec![
        Light::spot(
            Point3::new(0.0, 6.0, 2.0),
            Color::new(25.0, 25.0, 23.0),
            Vector3::new(0.0, -1.0, -0.3),
            8.0,
        ),
        Light::point(Point3::new(-4.0, 4.0, 4.0), Color::new(15.0, 15.0, 18.0)),
    ];
    let scene = Scene::new(
        vec![floor(floor_material), red, mirror],
        lights,
        Color::new(0.02, 0.02, 0.05),
    );
    let camera = camera(config, Point3::new(0.0, 1.5, 6.0), Point3::new(0.0, 0.0, 0.0));
    (scene, camera)
}

/// Dispersive glass sphere above a checkerboard
fn glass_sphere(config: &RenderConfig) -> (Scene, Camera) {
    let floor_material = Material::diffuse(checkerboard(
        128,
        8,
        Color::new(0.9, 0.9, 0.9),
        Color::new(0.1, 0.1, 0.1),
    ));
    let glass = Object::new(
        Geometry::sphere(Point3::new(0.0, 0.0, 0.0), 1.0),
        TextureMapping::spherical(Point3::new(0.0, 0.0, 0.0), vec2(1.0, 1.0)),
        Material::transmissive([1.51, 1.53, 1.55]),
    );
    let backdrop = Object::new(
        Geometry::sphere(Point3::new(-2.5, 0.0, -2.5), 1.0),
        TextureMapping::spherical(Point3::new(-2.5, 0.0, -2.5), vec2(1.0, 1.0)),
        Material::glossy(
            Texture::from_color(Color::new(0.1, 0.3, 0.6)),
            Texture::from_color(Color::new(0.3, 0.3, 0.3)),
            30.0,
        ),
    );
    let lights = vec![Light::point(
        Point3::new(3.0, 5.0, 3.0),
        Color::new(60.0, 60.0, 60.0),
    )];
    let scene = Scene::new(
        vec![floor(floor_material), glass, backdrop],
        lights,
        Color::new(0.05, 0.05, 0.1),
    );
    let camera = camera(config, Point3::new(0.0, 1.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    (scene, camera)
}

fn push_quad(soup: &mut TriangleSoup, corners: [Point3<Float>; 4]) {
    let [p0, p1, p2, p3] = corners;
    let uv0 = Point2::new(0.0, 0.0);
    let uv1 = Point2::new(1.0, 0.0);
    let uv2 = Point2::new(1.0, 1.0);
    let uv3 = Point2::new(0.0, 1.0);
    soup.push_flat_triangle([p0, p1, p2], [uv0, uv1, uv2]);
    soup.push_flat_triangle([p0, p2, p3], [uv0, uv2, uv3]);
}

/// Axis aligned cube with outward facing quads
fn cube(center: Point3<Float>, half: Float) -> TriangleSoup {
    let p = |dx: Float, dy: Float, dz: Float| {
        center + half * Vector3::new(dx, dy, dz)
    };
    let mut soup = TriangleSoup::new();
    // Front and back
    push_quad(&mut soup, [p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)]);
    push_quad(&mut soup, [p(1.0, -1.0, -1.0), p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0)]);
    // Right and left
    push_quad(&mut soup, [p(1.0, -1.0, 1.0), p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0)]);
    push_quad(&mut soup, [p(-1.0, -1.0, -1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0)]);
    // Top and bottom
    push_quad(&mut soup, [p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0), p(-1.0, 1.0, -1.0)]);
    push_quad(&mut soup, [p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0)]);
    soup
}

/// Textured cube mesh traced through its bounding volume hierarchy
fn cube_mesh(config: &RenderConfig) -> (Scene, Camera) {
    let floor_material = Material::diffuse(checkerboard(
        128,
        8,
        Color::new(0.7, 0.7, 0.75),
        Color::new(0.2, 0.2, 0.2),
    ));
    let cube_object = Object::new(
        Geometry::mesh(cube(Point3::new(0.0, -0.25, 0.0), 0.75)),
        TextureMapping::Vertex,
        Material::glossy(
            checkerboard(64, 4, Color::new(0.8, 0.5, 0.1), Color::new(0.2, 0.1, 0.4)),
            Texture::from_color(Color::new(0.2, 0.2, 0.2)),
            20.0,
        ),
    );
    let lights = vec![
        Light::point(Point3::new(3.0, 4.0, 4.0), Color::new(40.0, 40.0, 40.0)),
        Light::point(Point3::new(-4.0, 2.0, 1.0), Color::new(8.0, 8.0, 12.0)),
    ];
    let scene = Scene::new(
        vec![floor(floor_material), cube_object],
        lights,
        Color::new(0.03, 0.03, 0.06),
    );
    let camera = camera(config, Point3::new(2.5, 1.5, 4.0), Point3::new(0.0, -0.25, 0.0));
    (scene, camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scenes_are_complete() {
        let config = RenderConfig {
            width: 32,
            height: 32,
            ..RenderConfig::default()
        };
        let scenes = demo_scenes();
        assert_eq!(scenes.len(), 3);
        for (name, build) in scenes {
            let (scene, camera) = build(&config);
            assert!(!name.is_empty());
            assert!(!scene.objects.is_empty());
            assert!(!scene.lights.is_empty());
            assert_eq!((camera.width, camera.height), (32, 32));
        }
    }

    #[test]
    fn cube_soup_has_twelve_triangles() {
        let soup = cube(Point3::new(0.0, 0.0, 0.0), 1.0);
        assert_eq!(soup.num_triangles(), 12);
    }
}
