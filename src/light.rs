use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::Float;

/// The closed set of light sources
#[derive(Clone, Debug)]
pub enum Light {
    Point {
        position: Point3<Float>,
        power: Color,
    },
    /// Phong light cone pointing along a fixed direction
    Spot {
        position: Point3<Float>,
        power: Color,
        direction: Vector3<Float>,
        falloff: Float,
    },
}

impl Light {
    pub fn point(position: Point3<Float>, power: Color) -> Light {
        Light::Point { position, power }
    }

    pub fn spot(
        position: Point3<Float>,
        power: Color,
        direction: Vector3<Float>,
        falloff: Float,
    ) -> Light {
        Light::Spot {
            position,
            power,
            direction: direction.normalize(),
            falloff,
        }
    }

    pub fn position(&self) -> Point3<Float> {
        match self {
            Light::Point { position, .. } => *position,
            Light::Spot { position, .. } => *position,
        }
    }

    pub fn power(&self) -> Color {
        match self {
            Light::Point { power, .. } => *power,
            Light::Spot { power, .. } => *power,
        }
    }

    /// Radiant intensity emitted towards the world space direction omega
    pub fn emission(&self, omega: Vector3<Float>) -> Color {
        debug_assert!((omega.magnitude() - 1.0).abs() < 1e-4);
        match self {
            Light::Point { power, .. } => *power,
            Light::Spot {
                power,
                direction,
                falloff,
                ..
            } => {
                let cos_theta = omega.dot(*direction);
                *power * (falloff + 2.0) * cos_theta.max(0.0).powf(*falloff)
            }
        }
    }
}
