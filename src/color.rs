use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign};

use cgmath::prelude::*;
use cgmath::Vector3;

use crate::Float;

/// Convert u8 color component to float color in range [0, 1]
pub fn component_to_float(c: u8) -> Float {
    Float::from(c) / 255.0
}

/// Convert float color component in range [0, 1] to u8
pub fn component_to_u8(c: Float) -> u8 {
    (c.max(0.0).min(1.0) * 255.0).round() as u8
}

/// Convert linear component to srgb component
fn to_srgb(c: Float) -> Float {
    c.powf(1.0 / 2.2)
}

/// Linear rgb color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    color: Vector3<Float>,
}

impl Color {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self {
            color: Vector3::new(r, g, b),
        }
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn to_srgb_pixel(self) -> image::Rgb<u8> {
        image::Rgb([
            component_to_u8(to_srgb(self.color.x)),
            component_to_u8(to_srgb(self.color.y)),
            component_to_u8(to_srgb(self.color.z)),
        ])
    }

    pub fn is_black(&self) -> bool {
        self.color.x == 0.0 && self.color.y == 0.0 && self.color.z == 0.0
    }

    pub fn r(&self) -> Float {
        self.color.x
    }

    pub fn g(&self) -> Float {
        self.color.y
    }

    pub fn b(&self) -> Float {
        self.color.z
    }
}

impl Index<usize> for Color {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.color[i]
    }
}

impl IndexMut<usize> for Color {
    fn index_mut(&mut self, i: usize) -> &mut Float {
        &mut self.color[i]
    }
}

// Arithmetic operations

impl Add for Color {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.color += rhs.color;
    }
}

impl Div<Float> for Color {
    type Output = Self;

    fn div(mut self, rhs: Float) -> Self {
        self /= rhs;
        self
    }
}

impl DivAssign<Float> for Color {
    fn div_assign(&mut self, rhs: Float) {
        let recip = rhs.recip();
        self.color *= recip;
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Self) {
        self.color.mul_assign_element_wise(rhs.color);
    }
}

impl Mul<Float> for Color {
    type Output = Self;

    fn mul(mut self, rhs: Float) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign<Float> for Color {
    fn mul_assign(&mut self, rhs: Float) {
        self.color *= rhs;
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    // Delegate to Color Mul
    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_conversions_round_trip() {
        for &c in &[0u8, 1, 127, 254, 255] {
            assert_eq!(component_to_u8(component_to_float(c)), c);
        }
    }

    #[test]
    fn channel_indexing() {
        let mut c = Color::new(0.1, 0.2, 0.3);
        assert_eq!(c[0], 0.1);
        assert_eq!(c[2], 0.3);
        c[1] = 0.9;
        assert_eq!(c.g(), 0.9);
    }

    #[test]
    fn elementwise_arithmetic() {
        let c = Color::new(0.5, 1.0, 2.0) * Color::new(2.0, 0.5, 0.25);
        assert_eq!(c, Color::new(1.0, 0.5, 0.5));
        assert_eq!(2.0 * Color::new(0.25, 0.25, 0.25), Color::new(0.5, 0.5, 0.5));
        assert!(Color::black().is_black());
        assert!(!Color::white().is_black());
    }
}
