//! Ray type for the intersection engine.

use glam::DVec3;

/// A ray with an origin and a direction.
///
/// The direction is not necessarily normalized: shadow rays deliberately
/// span exactly the light-to-point vector so that `t < 1` means "between
/// the light and the shaded point".
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: DVec3,
    direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }
}
