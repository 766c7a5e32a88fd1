//! Infinite checkered plane actor.

use termray_math::{DVec3, MotionMatrix, Ray};
use termray_scene::{IdAllocator, IdError, IdRange, LightSource, Material};

use crate::actor::{Actor, Hit};

/// An infinite plane with two materials alternating in a checker pattern.
///
/// The plane is the canonical local y=0 plane carried to its world pose by
/// the motion transform (aligned to the target normal, then translated).
/// Checker lookup maps the world hit point back through `unapply` into
/// plane-local space, so the pattern stays pinned to the plane however the
/// actor moves.
pub struct PlaneActor {
    motion: MotionMatrix,
    point: DVec3,
    normal: DVec3,
    materials: [Material; 2],
    cell: f64,
    ids: IdRange,
}

impl PlaneActor {
    /// Create a plane through `point` with the given normal, reserving a
    /// single hit id.
    pub fn new(
        point: DVec3,
        normal: DVec3,
        light: Material,
        dark: Material,
        allocator: &IdAllocator,
    ) -> Result<Self, IdError> {
        let normal = normal.normalize();
        let mut motion = MotionMatrix::new();
        motion.align(DVec3::Y, DVec3::Z, normal, plane_tangent(normal));
        motion.move_to(point);

        Ok(Self {
            motion,
            point,
            normal,
            materials: [light, dark],
            cell: 1.0,
            ids: allocator.reserve(1)?,
        })
    }

    /// Set the checker cell size (default 1).
    pub fn with_cell(mut self, cell: f64) -> Self {
        self.cell = cell;
        self
    }

    /// The actor's motion transform, for animation by the frame loop.
    pub fn motion_mut(&mut self) -> &mut MotionMatrix {
        &mut self.motion
    }

    /// Ray/plane solve restricted to t in (0, limit). A zero denominator
    /// means the ray is parallel to the plane: no intersection.
    fn intersect_at(&self, ray: &Ray, limit: f64) -> Option<f64> {
        let denominator = self.normal.dot(ray.direction());
        if denominator == 0.0 {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin()) / denominator;
        if t <= 0.0 || t >= limit {
            return None;
        }
        Some(t)
    }
}

impl Actor for PlaneActor {
    fn prepare_for_ray_render(&mut self, _origin: DVec3, _lights: &[LightSource]) {
        // Rederive the world pose from the motion transform so frame-loop
        // animation through `motion_mut` is picked up.
        self.point = self.motion.translation();
        self.normal = self.motion.apply_vector(DVec3::Y).normalize();
    }

    fn ray_intersect(&self, ray: &Ray, current_best: f64) -> Option<Hit> {
        let t = self.intersect_at(ray, current_best)?;
        Some(Hit {
            proxy: t,
            id: self.ids.start(),
            point: ray.at(t),
        })
    }

    fn shade_at(&self, point: DVec3, _id: u32) -> Material {
        let local = self.motion.unapply(point);
        let parity = ((local.x / self.cell).floor() + (local.z / self.cell).floor()) as i64;
        self.materials[parity.rem_euclid(2) as usize]
    }

    fn normal_at(&self, _point: DVec3, _id: u32) -> DVec3 {
        self.normal
    }

    fn casts_shadow(&self, _light_index: usize, ray: &Ray, excluded_id: u32) -> bool {
        if self.ids.contains(excluded_id) {
            return false;
        }
        self.intersect_at(ray, 1.0).is_some()
    }

    fn id_range(&self) -> IdRange {
        self.ids
    }
}

/// Any unit vector perpendicular to the normal, for the align contract.
fn plane_tangent(normal: DVec3) -> DVec3 {
    let reference = if normal.y.abs() < 0.9 { DVec3::Y } else { DVec3::X };
    normal.cross(reference).normalize()
}
