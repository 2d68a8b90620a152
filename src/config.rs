use crate::texture::{TextureFilterMode, TextureWrapMode};
use crate::Float;

/// Render settings threaded explicitly through the tracer
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Width of the render target in pixels
    pub width: u32,
    /// Height of the render target in pixels
    pub height: u32,
    /// Maximum number of threads to use for rendering
    pub max_threads: usize,
    /// Samples per pixel
    pub spp: usize,
    /// Jitter samples on a stratified grid when spp is a square number
    pub stratified: bool,
    /// Maximum recursion depth
    pub max_depth: usize,
    /// Offset used to avoid self intersections of secondary rays
    pub ray_epsilon: Float,
    /// Shadow rays on or off
    pub shadows: bool,
    /// Ambient shading term on or off
    pub ambient: bool,
    /// Diffuse shading term on or off
    pub diffuse: bool,
    /// Specular shading term on or off
    pub specular: bool,
    /// Mirror reflection on or off
    pub reflection: bool,
    /// Transmission on or off
    pub transmission: bool,
    /// Blend reflection and transmission by the fresnel coefficient
    pub fresnel: bool,
    /// Per channel transmission for dispersive materials
    pub dispersion: bool,
    /// Should normal mapping be used
    pub normal_mapping: bool,
    pub tex_filter_mode: TextureFilterMode,
    pub tex_wrap_mode: TextureWrapMode,
}

impl RenderConfig {
    pub fn whitted() -> Self {
        Self {
            width: 800,
            height: 600,
            max_threads: num_cpus::get_physical(),
            spp: 4,
            stratified: true,
            max_depth: 4,
            ray_epsilon: 7e-3,
            shadows: true,
            ambient: true,
            diffuse: true,
            specular: true,
            reflection: true,
            transmission: true,
            fresnel: true,
            dispersion: false,
            normal_mapping: true,
            tex_filter_mode: TextureFilterMode::Trilinear,
            tex_wrap_mode: TextureWrapMode::Repeat,
        }
    }

    /// Fast settings for interactive tweaking
    #[allow(dead_code)]
    pub fn preview() -> Self {
        Self {
            spp: 1,
            stratified: false,
            max_depth: 2,
            tex_filter_mode: TextureFilterMode::Bilinear,
            ..Self::whitted()
        }
    }

    /// Direct lighting only
    #[allow(dead_code)]
    pub fn direct_only() -> Self {
        Self {
            reflection: false,
            transmission: false,
            fresnel: false,
            dispersion: false,
            ..Self::whitted()
        }
    }

    #[allow(dead_code)]
    pub fn single_threaded(self) -> Self {
        Self {
            max_threads: 1,
            ..self
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::whitted()
    }
}
