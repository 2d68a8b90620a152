use std::path::Path;

use crate::color::Color;

use super::coordinator::Block;

/// Accumulation buffer for traced radiance values
pub struct TracedImage {
    width: u32,
    height: u32,
    raw_image: Vec<f32>,
}

impl TracedImage {
    pub fn new(width: u32, height: u32) -> TracedImage {
        TracedImage {
            width,
            height,
            raw_image: vec![0.0; (3 * width * height) as usize],
        }
    }

    pub fn update_block(&mut self, block: &Block, data: &[f32]) {
        assert_eq!(data.len(), (3 * block.width * block.height) as usize);
        for h in 0..block.height {
            for w in 0..block.width {
                let i_image = 3 * ((h + block.top) * self.width + w + block.left) as usize;
                let i_block = 3 * (h * block.width + w) as usize;
                self.raw_image[i_image..i_image + 3]
                    .copy_from_slice(&data[i_block..i_block + 3]);
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let i = 3 * (y * self.width + x) as usize;
        [
            self.raw_image[i],
            self.raw_image[i + 1],
            self.raw_image[i + 2],
        ]
    }

    /// Save the image as srgb
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        let image = image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixel(x, y);
            Color::new(p[0].into(), p[1].into(), p[2].into()).to_srgb_pixel()
        });
        image.save(path)
    }
}
