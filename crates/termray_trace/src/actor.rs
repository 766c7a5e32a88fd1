//! Actor capability trait and hit record for ray-object intersection.

use termray_math::{DVec3, Ray};
use termray_scene::{Camera, IdRange, LightSource, Material};

/// Result of a nearest-hit query.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Distance proxy: monotonic with true distance along the ray (the raw
    /// ray parameter t), used only for comparison between candidates.
    pub proxy: f64,
    /// Hit id of the struck face or shape, from the actor's reserved block.
    pub id: u32,
    /// World-space intersection point.
    pub point: DVec3,
}

/// A renderable scene object: polygon mesh, sphere or infinite plane.
///
/// Actors own their geometry and caches. `prepare_for_ray_render` must have
/// completed for the frame's eye point and lights before any of the query
/// methods run; the renderer enforces this with a full barrier between the
/// preparation and shading phases.
pub trait Actor: Send + Sync {
    /// Per-frame animation hook, driven by the frame loop.
    fn act(&mut self, _dt: f64, _elapsed: f64, _camera: &Camera) {}

    /// Refresh both cache layers for the frame's eye point and lights.
    fn prepare_for_ray_render(&mut self, origin: DVec3, lights: &[LightSource]);

    /// Nearest intersection along the ray, if any beats `current_best`.
    ///
    /// The ray origin must be the origin the actor was prepared with.
    fn ray_intersect(&self, ray: &Ray, current_best: f64) -> Option<Hit>;

    /// Material properties at an intersection previously reported by
    /// `ray_intersect`.
    fn shade_at(&self, point: DVec3, id: u32) -> Material;

    /// Surface normal at an intersection previously reported by
    /// `ray_intersect`.
    fn normal_at(&self, point: DVec3, id: u32) -> DVec3;

    /// Whether this actor occludes the shadow ray for the given light.
    ///
    /// The ray spans exactly light-to-point, so only hits with t in (0,1)
    /// occlude. `excluded_id` names the face currently being shaded; the
    /// actor owning it skips that face to avoid self-shadowing from
    /// numerical coincidence.
    fn casts_shadow(&self, light_index: usize, ray: &Ray, excluded_id: u32) -> bool;

    /// The hit-id block this actor reserved at construction.
    fn id_range(&self) -> IdRange;

    /// World-space edges for wireframe drawing. Shapes without a natural
    /// edge representation report none.
    fn edges(&self) -> Vec<(DVec3, DVec3)> {
        Vec::new()
    }
}
