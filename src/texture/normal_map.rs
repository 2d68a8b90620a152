use cgmath::prelude::*;
use cgmath::{Point2, Vector3};

use crate::Float;

use super::{Image, ImageTexture, TextureWrapMode};

/// Tangent space normal map.
/// Texels encode unit normals as colors with (0, 0, 1) mapping to (0.5, 0.5, 1).
#[derive(Clone, Debug)]
pub struct NormalMap {
    map: ImageTexture,
}

impl NormalMap {
    pub fn from_image(image: Image) -> NormalMap {
        NormalMap {
            map: ImageTexture::new(image),
        }
    }

    /// Tangent space normal at the given uv coordinate
    pub fn normal(&self, uv: Point2<Float>, wrap_mode: TextureWrapMode) -> Vector3<Float> {
        let c = self.map.evaluate_bilinear(0, uv, wrap_mode);
        Vector3::new(2.0 * c.r() - 1.0, 2.0 * c.g() - 1.0, 2.0 * c.b() - 1.0).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn flat_map_decodes_to_unit_z() {
        let map = NormalMap::from_image(Image::from_fn(2, 2, |_, _| Color::new(0.5, 0.5, 1.0)));
        let n = map.normal(Point2::new(0.5, 0.5), TextureWrapMode::Repeat);
        assert!((n - Vector3::unit_z()).magnitude() < 1e-6);
    }
}
