//! Point light sources.

use termray_math::DVec3;

use crate::material::Color;

/// A point light with a position and a color.
///
/// Lights may be moved between frames by the frame loop; the renderer reads
/// their positions during the per-frame cache preparation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: DVec3,
    pub color: Color,
}

impl LightSource {
    /// Create a new light source.
    pub fn new(position: DVec3, color: Color) -> Self {
        Self { position, color }
    }

    /// A white light at the given position.
    pub fn white(position: DVec3) -> Self {
        Self::new(position, Color::ONE)
    }
}
