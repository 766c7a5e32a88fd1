//! Surface material properties for the flat Phong-style shading model.

use termray_math::DVec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// Material properties queried at the intersection point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base contribution added once per pixel
    pub ambient: Color,
    /// Surface color added once per pixel
    pub diffuse: Color,
    /// Per-light contribution added for each unoccluded light
    pub specular: Color,
    /// Specular exponent
    pub shininess: f64,
}

impl Material {
    /// Create a material from explicit components.
    pub fn new(ambient: Color, diffuse: Color, specular: Color, shininess: f64) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// A matte material: dim ambient, the given diffuse color, no specular.
    pub fn matte(diffuse: Color) -> Self {
        Self {
            ambient: diffuse * 0.1,
            diffuse,
            specular: Color::ZERO,
            shininess: 1.0,
        }
    }

    /// A shiny material: dim ambient, the given diffuse color, white specular.
    pub fn shiny(diffuse: Color) -> Self {
        Self {
            ambient: diffuse * 0.1,
            diffuse,
            specular: Color::splat(0.4),
            shininess: 32.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::matte(Color::splat(0.5))
    }
}
