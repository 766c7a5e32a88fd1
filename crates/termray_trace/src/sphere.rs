//! Sphere actor with closed-form ray intersection.

use termray_math::{DVec3, MotionMatrix, Ray};
use termray_scene::{IdAllocator, IdError, IdRange, LightSource, Material};

use crate::actor::{Actor, Hit};

/// A sphere under an affine motion transform. One hit id for the whole
/// shape; no caches are needed since the intersection is closed-form.
///
/// Only uniform scale is supported: the X scale factor scales the radius.
pub struct SphereActor {
    base_center: DVec3,
    radius: f64,
    motion: MotionMatrix,
    center: DVec3,
    world_radius: f64,
    material: Material,
    ids: IdRange,
}

impl SphereActor {
    /// Create a sphere actor, reserving a single hit id.
    pub fn new(
        center: DVec3,
        radius: f64,
        material: Material,
        allocator: &IdAllocator,
    ) -> Result<Self, IdError> {
        Ok(Self {
            base_center: center,
            radius,
            motion: MotionMatrix::new(),
            center,
            world_radius: radius,
            material,
            ids: allocator.reserve(1)?,
        })
    }

    /// The actor's motion transform, for animation by the frame loop.
    pub fn motion_mut(&mut self) -> &mut MotionMatrix {
        &mut self.motion
    }

    /// Solve the quadratic a t^2 + b t + c = 0 for the nearest root in
    /// (0, limit). Prefers the smaller positive root and falls back to the
    /// larger when the origin is inside the sphere.
    fn intersect_at(&self, ray: &Ray, limit: f64) -> Option<f64> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * ray.direction().dot(oc);
        let c = oc.dot(oc) - self.world_radius * self.world_radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let mut t = (-b - sqrt_d) / (2.0 * a);
        if t <= 0.0 {
            t = (-b + sqrt_d) / (2.0 * a);
        }
        if t <= 0.0 || t >= limit {
            return None;
        }
        Some(t)
    }
}

impl Actor for SphereActor {
    fn prepare_for_ray_render(&mut self, _origin: DVec3, _lights: &[LightSource]) {
        self.center = self.motion.apply(self.base_center);
        self.world_radius = self.radius * self.motion.scale().x;
    }

    fn ray_intersect(&self, ray: &Ray, current_best: f64) -> Option<Hit> {
        let t = self.intersect_at(ray, current_best)?;
        Some(Hit {
            proxy: t,
            id: self.ids.start(),
            point: ray.at(t),
        })
    }

    fn shade_at(&self, _point: DVec3, _id: u32) -> Material {
        self.material
    }

    fn normal_at(&self, point: DVec3, _id: u32) -> DVec3 {
        (point - self.center) / self.world_radius
    }

    fn casts_shadow(&self, _light_index: usize, ray: &Ray, excluded_id: u32) -> bool {
        if self.ids.contains(excluded_id) {
            return false;
        }
        // The shadow ray spans exactly light-to-point, so any root in
        // (0, 1) occludes.
        self.intersect_at(ray, 1.0).is_some()
    }

    fn id_range(&self) -> IdRange {
        self.ids
    }
}
