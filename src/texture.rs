use std::fmt;

use cgmath::{Point2, Vector2};

use crate::color::Color;
use crate::float::*;

mod normal_map;

pub use self::normal_map::NormalMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFilterMode {
    Nearest,
    Bilinear,
    Trilinear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureWrapMode {
    Clamp,
    Repeat,
}

/// Clamp an arbitrary texel coordinate to [0, size)
pub fn wrap_clamp(val: i32, size: i32) -> i32 {
    debug_assert!(size > 0);
    val.max(0).min(size - 1)
}

/// Map an arbitrary texel coordinate to [0, size) so the texture repeats
pub fn wrap_repeat(val: i32, size: i32) -> i32 {
    debug_assert!(size > 0);
    val.rem_euclid(size)
}

/// Float rgb pixel buffer
#[derive(Clone)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Image {
        assert!(width > 0 && height > 0, "Tried to create an empty image!");
        Image {
            width,
            height,
            pixels: vec![Color::black(); width * height],
        }
    }

    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Image
    where
        F: Fn(usize, usize) -> Color,
    {
        let mut image = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                image.set_texel(x, y, f(x, y));
            }
        }
        image
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    pub fn set_texel(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * self.width + x] = color;
    }

    /// Texel lookup with out of bounds coordinates wrapped back in
    pub fn get_texel(&self, x: i32, y: i32, wrap_mode: TextureWrapMode) -> Color {
        let (x, y) = match wrap_mode {
            TextureWrapMode::Clamp => (
                wrap_clamp(x, self.width as i32),
                wrap_clamp(y, self.height as i32),
            ),
            TextureWrapMode::Repeat => (
                wrap_repeat(x, self.width as i32),
                wrap_repeat(y, self.height as i32),
            ),
        };
        self.texel(x as usize, y as usize)
    }

    /// Mean intensity over all pixels
    pub fn average(&self) -> Color {
        let mut sum = Color::black();
        for pixel in &self.pixels {
            sum += *pixel;
        }
        sum / self.pixels.len().to_float()
    }
}

// Images are big so only print the dimensions
impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Image({}x{})", self.width, self.height)
    }
}

/// Texture image with its mip chain.
/// Level 0 is the original image and each level halves the dimensions
/// until 1x1. The chain is built once and immutable afterwards.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    mip_levels: Vec<Image>,
}

impl ImageTexture {
    /// Wrap a base image and build its mip chain when the dimensions allow
    pub fn new(base: Image) -> ImageTexture {
        let pow2 = base.width().is_power_of_two() && base.height().is_power_of_two();
        let mut texture = ImageTexture {
            mip_levels: vec![base],
        };
        if pow2 {
            texture.create_mipmap();
        }
        texture
    }

    pub fn levels(&self) -> usize {
        self.mip_levels.len()
    }

    pub fn level(&self, i: usize) -> &Image {
        &self.mip_levels[i]
    }

    /// Build the mip chain by iteratively halving the base image.
    /// Each new texel is the box filtered average of up to four texels
    /// of the previous level.
    pub fn create_mipmap(&mut self) {
        let base = &self.mip_levels[0];
        assert!(
            base.width().is_power_of_two() && base.height().is_power_of_two(),
            "Mipmapped textures must have power of two dimensions!"
        );
        self.mip_levels.truncate(1);
        let mut size_x = self.mip_levels[0].width();
        let mut size_y = self.mip_levels[0].height();
        while size_x > 1 || size_y > 1 {
            size_x = 1.max(size_x / 2);
            size_y = 1.max(size_y / 2);
            let prev = self.mip_levels.last().unwrap();
            let mut level = Image::new(size_x, size_y);
            for y in 0..size_y {
                for x in 0..size_x {
                    // Clamp the source coordinates at odd sized boundaries
                    let x0 = 2 * x;
                    let y0 = 2 * y;
                    let x1 = (2 * x + 1).min(prev.width() - 1);
                    let y1 = (2 * y + 1).min(prev.height() - 1);
                    let c = (prev.texel(x0, y0)
                        + prev.texel(x1, y0)
                        + prev.texel(x0, y1)
                        + prev.texel(x1, y1))
                        / 4.0;
                    level.set_texel(x, y, c);
                }
            }
            self.mip_levels.push(level);
        }
    }

    /// Evaluate the given mip level without filtering
    pub fn evaluate_nearest(
        &self,
        level: usize,
        uv: Point2<Float>,
        wrap_mode: TextureWrapMode,
    ) -> Color {
        let image = &self.mip_levels[level];
        let s = (uv.x * image.width().to_float()).floor() as i32;
        let t = (uv.y * image.height().to_float()).floor() as i32;
        image.get_texel(s, t, wrap_mode)
    }

    /// Bilinearly filter the given mip level.
    /// Texel colors are interpreted as colors at the texel centers.
    pub fn evaluate_bilinear(
        &self,
        level: usize,
        uv: Point2<Float>,
        wrap_mode: TextureWrapMode,
    ) -> Color {
        let image = &self.mip_levels[level];
        let s = uv.x * image.width().to_float() - 0.5;
        let t = uv.y * image.height().to_float() - 0.5;
        let s0 = s.floor();
        let t0 = t.floor();
        let ds = s - s0;
        let dt = t - t0;
        let s0 = s0 as i32;
        let t0 = t0 as i32;
        let c00 = image.get_texel(s0, t0, wrap_mode);
        let c10 = image.get_texel(s0 + 1, t0, wrap_mode);
        let c01 = image.get_texel(s0, t0 + 1, wrap_mode);
        let c11 = image.get_texel(s0 + 1, t0 + 1, wrap_mode);
        let c0 = c00 * (1.0 - ds) + c10 * ds;
        let c1 = c01 * (1.0 - ds) + c11 * ds;
        c0 * (1.0 - dt) + c1 * dt
    }

    /// Trilinear filtering over the mip chain.
    /// The uv footprint selects the two mip levels whose texel sizes
    /// bracket the footprint and blends their bilinear samples.
    pub fn evaluate_trilinear(
        &self,
        uv: Point2<Float>,
        dudv: Vector2<Float>,
        wrap_mode: TextureWrapMode,
    ) -> Color {
        let base = &self.mip_levels[0];
        let footprint = (dudv.x * base.width().to_float()).max(dudv.y * base.height().to_float());
        if self.mip_levels.len() < 2 || !(footprint > 0.0) {
            return self.evaluate_bilinear(0, uv, wrap_mode);
        }
        let max_level = self.mip_levels.len() - 2;
        let level = (footprint.log2().floor() as i32)
            .max(0)
            .min(max_level as i32) as usize;
        let c0 = self.evaluate_bilinear(level, uv, wrap_mode);
        let c1 = self.evaluate_bilinear(level + 1, uv, wrap_mode);
        let texel_size = (2.0 as Float).powi(level as i32);
        let alpha = ((footprint - texel_size) / texel_size).max(0.0).min(1.0);
        c0 * (1.0 - alpha) + c1 * alpha
    }
}

/// Texture backing a material coefficient
#[derive(Clone)]
pub enum Texture {
    Solid(Color),
    Image(ImageTexture),
}

impl Texture {
    pub fn from_color(color: Color) -> Texture {
        Texture::Solid(color)
    }

    pub fn from_image(image: Image) -> Texture {
        Texture::Image(ImageTexture::new(image))
    }

    pub fn evaluate(
        &self,
        uv: Point2<Float>,
        dudv: Vector2<Float>,
        filter_mode: TextureFilterMode,
        wrap_mode: TextureWrapMode,
    ) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Image(texture) => match filter_mode {
                TextureFilterMode::Nearest => texture.evaluate_nearest(0, uv, wrap_mode),
                TextureFilterMode::Bilinear => texture.evaluate_bilinear(0, uv, wrap_mode),
                TextureFilterMode::Trilinear => texture.evaluate_trilinear(uv, dudv, wrap_mode),
            },
        }
    }
}

// Implement debug manually because the image variant would flood the output
impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Texture::Image(texture) => texture.fmt(f),
            Texture::Solid(color) => color.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;

    fn gradient_image(width: usize, height: usize) -> Image {
        Image::from_fn(width, height, |x, y| {
            Color::new(
                x.to_float() / width.to_float(),
                y.to_float() / height.to_float(),
                1.0,
            )
        })
    }

    #[test]
    fn wrap_clamp_stays_in_bounds() {
        assert_eq!(wrap_clamp(-5, 4), 0);
        assert_eq!(wrap_clamp(0, 4), 0);
        assert_eq!(wrap_clamp(3, 4), 3);
        assert_eq!(wrap_clamp(4, 4), 3);
        assert_eq!(wrap_clamp(i32::max_value(), 4), 3);
        assert_eq!(wrap_clamp(i32::min_value(), 4), 0);
    }

    #[test]
    fn wrap_repeat_is_periodic() {
        for &val in &[-2_000_000_001, -13, -1, 0, 1, 6, 7, 2_000_000_002] {
            let wrapped = wrap_repeat(val, 7);
            assert!((0..7).contains(&wrapped));
            for &k in &[-3i64, -1, 1, 5] {
                let shifted = (i64::from(val) + k * 7) as i32;
                assert_eq!(wrap_repeat(shifted, 7), wrapped);
            }
        }
    }

    #[test]
    fn mip_chain_ends_in_single_texel() {
        let texture = ImageTexture::new(gradient_image(8, 4));
        // 8x4, 4x2, 2x1, 1x1
        assert_eq!(texture.levels(), 4);
        let last = texture.level(3);
        assert_eq!((last.width(), last.height()), (1, 1));
    }

    #[test]
    fn mip_levels_preserve_the_average() {
        let texture = ImageTexture::new(gradient_image(8, 8));
        let expected = texture.level(0).average();
        for i in 1..texture.levels() {
            let average = texture.level(i).average();
            for c in 0..3 {
                assert!(
                    (average[c] - expected[c]).abs() < 1e-9,
                    "Level {} average drifted",
                    i
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn mipmap_requires_power_of_two() {
        let mut texture = ImageTexture {
            mip_levels: vec![gradient_image(6, 4)],
        };
        texture.create_mipmap();
    }

    #[test]
    fn bilinear_is_exact_at_texel_centers() {
        let image = gradient_image(4, 4);
        let texture = ImageTexture::new(image.clone());
        for y in 0..4 {
            for x in 0..4 {
                let uv = Point2::new(
                    (x.to_float() + 0.5) / 4.0,
                    (y.to_float() + 0.5) / 4.0,
                );
                let expected = image.texel(x, y);
                let c = texture.evaluate_bilinear(0, uv, TextureWrapMode::Clamp);
                for i in 0..3 {
                    assert!((c[i] - expected[i]).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn nearest_picks_the_containing_texel() {
        let image = gradient_image(4, 4);
        let texture = ImageTexture::new(image.clone());
        let c = texture.evaluate_nearest(
            0,
            Point2::new(0.3, 0.8),
            TextureWrapMode::Clamp,
        );
        assert_eq!(c, image.texel(1, 3));
    }

    #[test]
    fn bilinear_repeat_wraps_across_the_seam() {
        let image = Image::from_fn(2, 2, |x, _| {
            if x == 0 {
                Color::black()
            } else {
                Color::white()
            }
        });
        let texture = ImageTexture::new(image);
        // Midway between the last and the (wrapped) first column
        let c = texture.evaluate_bilinear(0, Point2::new(0.0, 0.25), TextureWrapMode::Repeat);
        for i in 0..3 {
            assert!((c[i] - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn trilinear_with_full_footprint_returns_the_coarsest_level() {
        let texture = ImageTexture::new(gradient_image(2, 2));
        let expected = texture.level(1).texel(0, 0);
        let c = texture.evaluate_trilinear(
            Point2::new(0.5, 0.5),
            vec2(1.0, 1.0),
            TextureWrapMode::Clamp,
        );
        for i in 0..3 {
            assert!((c[i] - expected[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn trilinear_with_degenerate_footprint_matches_bilinear() {
        let texture = ImageTexture::new(gradient_image(4, 4));
        let uv = Point2::new(0.3, 0.7);
        let expected = texture.evaluate_bilinear(0, uv, TextureWrapMode::Repeat);
        let c = texture.evaluate_trilinear(uv, vec2(0.0, 0.0), TextureWrapMode::Repeat);
        assert_eq!(c, expected);
    }
}
