use cgmath::{Point2, Vector2, Vector3};

use crate::color::Color;
use crate::config::RenderConfig;
use crate::texture::{NormalMap, Texture};
use crate::Float;

/// Texture backed surface description.
/// Coefficients are resolved per intersection by uv lookup.
#[derive(Debug)]
pub struct Material {
    /// Diffuse coefficient
    pub k_d: Texture,
    /// Specular coefficient
    pub k_s: Texture,
    /// Ambient coefficient
    pub k_a: Texture,
    /// Shininess exponent
    pub n: Float,
    /// Relative refraction index per color channel.
    /// All zeros marks an opaque material.
    pub eta_of_channel: [Float; 3],
    pub normal_map: Option<NormalMap>,
}

impl Material {
    /// Purely diffuse material without ambient response
    pub fn diffuse(k_d: Texture) -> Material {
        Material {
            k_d,
            k_s: Texture::from_color(Color::black()),
            k_a: Texture::from_color(Color::black()),
            n: 1.0,
            eta_of_channel: [0.0; 3],
            normal_map: None,
        }
    }

    /// Phong material with a specular highlight and mirror response
    pub fn glossy(k_d: Texture, k_s: Texture, n: Float) -> Material {
        Material {
            k_s,
            n,
            ..Material::diffuse(k_d)
        }
    }

    /// Clear dielectric with per channel refraction indices
    pub fn transmissive(eta_of_channel: [Float; 3]) -> Material {
        Material {
            eta_of_channel,
            ..Material::diffuse(Texture::from_color(Color::black()))
        }
    }

    pub fn with_ambient(self, k_a: Texture) -> Material {
        Material { k_a, ..self }
    }

    pub fn with_normal_map(self, normal_map: NormalMap) -> Material {
        Material {
            normal_map: Some(normal_map),
            ..self
        }
    }

    /// Resolve the material at the given uv coordinate
    pub fn evaluate(
        &self,
        uv: Point2<Float>,
        dudv: Vector2<Float>,
        config: &RenderConfig,
    ) -> MaterialSample {
        let filter = config.tex_filter_mode;
        let wrap = config.tex_wrap_mode;
        let normal = match &self.normal_map {
            Some(map) if config.normal_mapping => map.normal(uv, wrap),
            _ => Vector3::unit_z(),
        };
        MaterialSample {
            k_d: self.k_d.evaluate(uv, dudv, filter, wrap),
            k_s: self.k_s.evaluate(uv, dudv, filter, wrap),
            k_a: self.k_a.evaluate(uv, dudv, filter, wrap),
            n: self.n,
            eta_of_channel: self.eta_of_channel,
            normal,
        }
    }
}

/// Material resolved at a single intersection
#[derive(Clone, Copy, Debug)]
pub struct MaterialSample {
    pub k_d: Color,
    pub k_s: Color,
    pub k_a: Color,
    pub n: Float,
    pub eta_of_channel: [Float; 3],
    /// Tangent space shading normal
    pub normal: Vector3<Float>,
}

impl MaterialSample {
    /// Sample of a pitch black material
    pub fn none() -> MaterialSample {
        MaterialSample {
            k_d: Color::black(),
            k_s: Color::black(),
            k_a: Color::black(),
            n: 1.0,
            eta_of_channel: [0.0; 3],
            normal: Vector3::unit_z(),
        }
    }

    pub fn is_transmissive(&self) -> bool {
        self.eta_of_channel != [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureFilterMode;
    use cgmath::prelude::*;
    use cgmath::vec2;

    #[test]
    fn solid_textures_resolve_to_their_color() {
        let material = Material::glossy(
            Texture::from_color(Color::new(0.5, 0.25, 0.125)),
            Texture::from_color(Color::white()),
            10.0,
        );
        let config = RenderConfig {
            tex_filter_mode: TextureFilterMode::Nearest,
            ..RenderConfig::default()
        };
        let sample = material.evaluate(Point2::new(0.3, 0.8), vec2(0.0, 0.0), &config);
        assert_eq!(sample.k_d, Color::new(0.5, 0.25, 0.125));
        assert_eq!(sample.k_s, Color::white());
        assert!(sample.k_a.is_black());
        assert!(!sample.is_transmissive());
        assert_eq!(sample.normal, Vector3::unit_z());
    }

    #[test]
    fn transmissive_materials_carry_their_etas() {
        let material = Material::transmissive([1.5, 1.55, 1.6]);
        let sample = material.evaluate(
            Point2::origin(),
            Vector2::zero(),
            &RenderConfig::default(),
        );
        assert!(sample.is_transmissive());
        assert_eq!(sample.eta_of_channel, [1.5, 1.55, 1.6]);
    }
}
