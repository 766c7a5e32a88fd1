//! Polygon mesh actor.

use termray_math::{DVec3, MotionMatrix, Ray};
use termray_scene::{IdAllocator, IdError, IdRange, LightSource, Material, Mesh};

use crate::actor::{Actor, Hit};
use crate::cache::{GeometryCache, RayCache};

/// A polygon mesh under an affine motion transform, with layered caches.
///
/// World-space vertices are rederived from the immutable base mesh through
/// the motion transform whenever its version changes, so animation never
/// accumulates incremental rounding error. One hit id per face.
pub struct PolyActor {
    mesh: Mesh,
    motion: MotionMatrix,
    /// World-space vertices, valid for the geometry cache's version.
    vertices: Vec<DVec3>,
    material: Material,
    ids: IdRange,
    geometry: GeometryCache,
    /// Dependent caches by origin: [0] is the eye, [1..] one per light.
    ray_caches: Vec<RayCache>,
}

impl PolyActor {
    /// Create an actor for a mesh, reserving one hit id per face.
    pub fn new(mesh: Mesh, material: Material, allocator: &IdAllocator) -> Result<Self, IdError> {
        let ids = allocator.reserve(mesh.face_count() as u32)?;
        let vertices = mesh.base_vertices().to_vec();
        Ok(Self {
            mesh,
            motion: MotionMatrix::new(),
            vertices,
            material,
            ids,
            geometry: GeometryCache::new(),
            ray_caches: Vec::new(),
        })
    }

    /// The actor's motion transform, for animation by the frame loop.
    pub fn motion_mut(&mut self) -> &mut MotionMatrix {
        &mut self.motion
    }

    pub fn motion(&self) -> &MotionMatrix {
        &self.motion
    }
}

impl Actor for PolyActor {
    fn prepare_for_ray_render(&mut self, origin: DVec3, lights: &[LightSource]) {
        let version = self.motion.version();
        let rebuilt = !self.geometry.is_fresh_for(version);
        if rebuilt {
            for (world, &base) in self.vertices.iter_mut().zip(self.mesh.base_vertices()) {
                *world = self.motion.apply(base);
            }
            self.geometry.refresh(&self.vertices, self.mesh.faces(), version);
        }

        if self.ray_caches.len() != lights.len() + 1 {
            self.ray_caches.resize_with(lights.len() + 1, RayCache::new);
        }
        self.ray_caches[0].refresh(&self.geometry, origin, rebuilt);
        for (cache, light) in self.ray_caches[1..].iter_mut().zip(lights) {
            cache.refresh(&self.geometry, light.position, rebuilt);
        }
    }

    fn ray_intersect(&self, ray: &Ray, current_best: f64) -> Option<Hit> {
        let cache = self.ray_caches.first()?;
        if !cache.does_vector_intersect(&self.geometry, ray.direction(), current_best) {
            return None;
        }
        let hit = cache.find_closest_intersection(&self.geometry, ray.direction(), current_best)?;
        Some(Hit {
            proxy: hit.t,
            id: self.ids.id_at(hit.face),
            point: hit.point,
        })
    }

    fn shade_at(&self, _point: DVec3, _id: u32) -> Material {
        self.material
    }

    fn normal_at(&self, _point: DVec3, id: u32) -> DVec3 {
        self.geometry.face_normal(self.ids.offset(id)).normalize()
    }

    fn casts_shadow(&self, light_index: usize, ray: &Ray, excluded_id: u32) -> bool {
        let Some(cache) = self.ray_caches.get(light_index + 1) else {
            return false;
        };
        let skip = self
            .ids
            .contains(excluded_id)
            .then(|| self.ids.offset(excluded_id));
        cache.is_intersection_within_one(&self.geometry, ray.direction(), skip)
    }

    fn id_range(&self) -> IdRange {
        self.ids
    }

    fn edges(&self) -> Vec<(DVec3, DVec3)> {
        let base = self.mesh.base_vertices();
        self.mesh
            .edges()
            .iter()
            .map(|&(a, b)| (self.motion.apply(base[a]), self.motion.apply(base[b])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn quad_actor(allocator: &IdAllocator) -> PolyActor {
        PolyActor::new(Mesh::quad(), Material::default(), allocator).unwrap()
    }

    #[test]
    fn test_quad_scenario() {
        let allocator = IdAllocator::new();
        let mut actor = quad_actor(&allocator);
        actor.prepare_for_ray_render(DVec3::new(0.0, 0.0, 5.0), &[]);

        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let hit = actor.ray_intersect(&ray, f64::INFINITY).expect("hit");

        assert!((hit.proxy - 5.0).abs() < 1e-9);
        assert!(hit.point.length() < 1e-9);
        assert!(actor.id_range().contains(hit.id));

        let normal = actor.normal_at(hit.point, hit.id);
        assert!((normal - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_motion_moves_hits() {
        let allocator = IdAllocator::new();
        let mut actor = quad_actor(&allocator);
        actor.motion_mut().move_by(DVec3::new(0.0, 0.0, -2.0));
        actor.prepare_for_ray_render(DVec3::new(0.0, 0.0, 5.0), &[]);

        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let hit = actor.ray_intersect(&ray, f64::INFINITY).expect("hit");

        assert!((hit.proxy - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertices_rederive_without_drift() {
        let allocator = IdAllocator::new();
        let mut actor = quad_actor(&allocator);

        // Many small rotations summing to a quarter turn about Y.
        for _ in 0..90 {
            actor.motion_mut().rotate_y(FRAC_PI_2 / 90.0);
            actor.prepare_for_ray_render(DVec3::new(5.0, 0.0, 0.0), &[]);
        }

        // The quad now faces +X; a ray along -X hits it at distance 5.
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0));
        let hit = actor.ray_intersect(&ray, f64::INFINITY).expect("hit");
        assert!((hit.proxy - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_shadow_between_light_and_point() {
        let allocator = IdAllocator::new();
        let mut actor = quad_actor(&allocator);
        let light = LightSource::white(DVec3::new(0.0, 0.0, 5.0));
        actor.prepare_for_ray_render(DVec3::new(0.0, 0.0, 20.0), &[light]);

        // Point on the far side of the quad from the light: occluded.
        let shadow = Ray::new(light.position, DVec3::new(0.0, 0.0, -5.0) - light.position);
        assert!(actor.casts_shadow(0, &shadow, 0));

        // Shading the quad's own face must not self-shadow.
        let own_id = actor.id_range().id_at(0);
        let to_face = Ray::new(light.position, DVec3::ZERO - light.position);
        assert!(!actor.casts_shadow(0, &to_face, own_id));
    }

    #[test]
    fn test_edges_follow_motion() {
        let allocator = IdAllocator::new();
        let mut actor = quad_actor(&allocator);
        actor.motion_mut().move_by(DVec3::new(10.0, 0.0, 0.0));

        let edges = actor.edges();
        assert_eq!(edges.len(), 4);
        for (a, b) in edges {
            assert!(a.x >= 9.0 && b.x >= 9.0);
        }
    }

    #[test]
    fn test_id_blocks_are_disjoint_across_actors() {
        let allocator = IdAllocator::new();
        let first = quad_actor(&allocator);
        let second = quad_actor(&allocator);

        let first_id = first.id_range().id_at(0);
        assert!(!second.id_range().contains(first_id));
    }
}
