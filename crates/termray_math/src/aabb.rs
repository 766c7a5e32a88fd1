use glam::DVec3;

use crate::Interval;

/// Axis-aligned bounding box used for per-face and per-actor culling.
///
/// Defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow the AABB just enough to contain a point.
    pub fn grow(&self, p: DVec3) -> Aabb {
        Aabb {
            x: self.x.grow(p.x),
            y: self.y.grow(p.y),
            z: self.z.grow(p.z),
        }
    }

    /// Expand the AABB by padding on every side.
    pub fn expand(&self, padding: f64) -> Aabb {
        Aabb {
            x: self.x.expand(padding),
            y: self.y.expand(padding),
            z: self.z.expand(padding),
        }
    }

    /// Test whether a point lies within the box (boundary inclusive).
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// The minimum corner.
    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// The maximum corner.
    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// An empty AABB (contains nothing).
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(DVec3::new(10.0, 0.0, -1.0), DVec3::new(0.0, 10.0, 1.0));

        assert_eq!(aabb.x.min, 0.0);
        assert_eq!(aabb.x.max, 10.0);
        assert_eq!(aabb.y.min, 0.0);
        assert_eq!(aabb.y.max, 10.0);
        assert_eq!(aabb.z.min, -1.0);
        assert_eq!(aabb.z.max, 1.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(DVec3::ZERO, DVec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(DVec3::new(3.0, 3.0, 3.0), DVec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);
    }

    #[test]
    fn test_aabb_grow_from_empty() {
        let aabb = Aabb::EMPTY
            .grow(DVec3::new(1.0, 2.0, 3.0))
            .grow(DVec3::new(-1.0, 0.0, 5.0));

        assert_eq!(aabb.min(), DVec3::new(-1.0, 0.0, 3.0));
        assert_eq!(aabb.max(), DVec3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::from_points(DVec3::new(-1.0, -1.0, -1.0), DVec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(DVec3::ZERO));
        // Boundary is inclusive
        assert!(aabb.contains_point(DVec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains_point(DVec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_expand() {
        let aabb = Aabb::from_points(DVec3::ZERO, DVec3::ONE).expand(0.5);

        assert_eq!(aabb.min(), DVec3::splat(-0.5));
        assert_eq!(aabb.max(), DVec3::splat(1.5));
    }
}
