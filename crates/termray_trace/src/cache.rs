//! Layered geometric caches for polygon actors.
//!
//! The per-face work of a ray query is split into two layers so that each
//! piece is recomputed as rarely as possible:
//!
//! - [`GeometryCache`] holds everything that depends only on the world-space
//!   vertices: face normals, padded bounding boxes, and the 2D projections
//!   used by the point-in-polygon test. It goes stale when the actor's
//!   motion version changes.
//! - [`RayCache`] holds the scalar numerators of the ray/plane equations
//!   for one fixed ray origin (the eye, or a light). Only the denominator
//!   depends on the ray direction, so per ray the plane solve is a single
//!   dot product and a division.

use termray_math::{Aabb, DVec3};

/// Padding applied to per-face and global bounding boxes.
const BOX_PADDING: f64 = 1e-7;

/// Lifecycle of a lazily built cache layer, keyed on the motion version.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CacheState {
    Uninitialized,
    Stale,
    Fresh(u64),
}

/// Per-face data that does not depend on the ray origin.
struct FaceData {
    /// Face normal, cross product of the first two edges (unnormalized).
    normal: DVec3,
    /// Padded axis-aligned bounding box.
    bounds: Aabb,
    /// A known point on the face plane (the first vertex).
    plane_point: DVec3,
    /// Axis discarded for the 2D point-in-polygon test: the axis of the
    /// largest absolute normal component. Dropping the smallest-range axis
    /// instead can degenerate into near-colinear projections for thin,
    /// rotated faces and silently fail the test.
    dropped: usize,
    /// Retained-axis coordinates for every face vertex.
    u: Vec<f64>,
    v: Vec<f64>,
}

/// Canonical unit-cube faces: outward normal, and whether the plane passes
/// through the global box's max corner (true) or min corner (false).
const CUBE_PLANES: [(DVec3, bool); 6] = [
    (DVec3::X, true),
    (DVec3::NEG_X, false),
    (DVec3::Y, true),
    (DVec3::NEG_Y, false),
    (DVec3::Z, true),
    (DVec3::NEG_Z, false),
];

/// Origin-independent cache layer for one polygon actor.
pub struct GeometryCache {
    faces: Vec<FaceData>,
    bounds: Aabb,
    cube_points: [DVec3; 6],
    state: CacheState,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self {
            faces: Vec::new(),
            bounds: Aabb::EMPTY,
            cube_points: [DVec3::ZERO; 6],
            state: CacheState::Uninitialized,
        }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Whether the cache matches the given motion version.
    pub fn is_fresh_for(&self, version: u64) -> bool {
        self.state == CacheState::Fresh(version)
    }

    /// Force a rebuild on the next refresh even if the version matches.
    pub fn mark_stale(&mut self) {
        if self.state != CacheState::Uninitialized {
            self.state = CacheState::Stale;
        }
    }

    /// The actor's padded global bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Unnormalized normal of a face.
    pub fn face_normal(&self, face: usize) -> DVec3 {
        self.faces[face].normal
    }

    /// Rebuild every origin-independent field from world-space vertices.
    pub fn refresh(&mut self, vertices: &[DVec3], faces: &[Vec<usize>], version: u64) {
        self.faces.clear();
        self.faces.reserve(faces.len());
        let mut bounds = Aabb::EMPTY;

        for face in faces {
            let p0 = vertices[face[0]];
            let p1 = vertices[face[1]];
            let p2 = vertices[face[2]];
            let normal = (p1 - p0).cross(p2 - p1);

            let mut face_bounds = Aabb::EMPTY;
            for &index in face {
                face_bounds = face_bounds.grow(vertices[index]);
            }
            let face_bounds = face_bounds.expand(BOX_PADDING);
            bounds = Aabb::surrounding(&bounds, &face_bounds);

            let dropped = dominant_axis(normal);
            let mut u = Vec::with_capacity(face.len());
            let mut v = Vec::with_capacity(face.len());
            for &index in face {
                let (cu, cv) = drop_axis(vertices[index], dropped);
                u.push(cu);
                v.push(cv);
            }

            self.faces.push(FaceData {
                normal,
                bounds: face_bounds,
                plane_point: p0,
                dropped,
                u,
                v,
            });
        }

        self.bounds = bounds;
        for (slot, (_, use_max)) in self.cube_points.iter_mut().zip(CUBE_PLANES) {
            *slot = if use_max { bounds.max() } else { bounds.min() };
        }

        log::trace!("geometry cache rebuilt: {} faces, version {version}", faces.len());
        self.state = CacheState::Fresh(version);
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A face hit found by the nearest-intersection search.
#[derive(Clone, Copy, Debug)]
pub struct FaceHit {
    pub t: f64,
    pub face: usize,
    pub point: DVec3,
}

/// Origin-dependent cache layer: ray/plane numerators for one fixed origin.
pub struct RayCache {
    origin: Option<DVec3>,
    numerators: Vec<f64>,
    cube_numerators: [f64; 6],
}

impl RayCache {
    pub fn new() -> Self {
        Self {
            origin: None,
            numerators: Vec::new(),
            cube_numerators: [0.0; 6],
        }
    }

    /// Recompute the numerators for a new origin. No-op when the origin is
    /// unchanged and the geometry layer was not rebuilt.
    pub fn refresh(&mut self, geometry: &GeometryCache, origin: DVec3, geometry_changed: bool) {
        if !geometry_changed && self.origin == Some(origin) {
            return;
        }

        self.numerators.clear();
        self.numerators.reserve(geometry.faces.len());
        for face in &geometry.faces {
            let d = -face.normal.dot(face.plane_point);
            self.numerators.push(-(face.normal.dot(origin) + d));
        }

        for (slot, ((normal, _), point)) in self
            .cube_numerators
            .iter_mut()
            .zip(CUBE_PLANES.iter().zip(geometry.cube_points))
        {
            let d = -normal.dot(point);
            *slot = -(normal.dot(origin) + d);
        }

        self.origin = Some(origin);
    }

    /// Cheap necessary condition: could a ray from the cached origin along
    /// `direction` strike the global bounding box nearer than
    /// `current_best`?
    ///
    /// Tests the six bounding-cube planes. Any in-box hit within
    /// `current_best` accepts immediately; seeing both a behind-hit
    /// (t < 0) and an in-box hit beyond the current best also accepts,
    /// since the box then brackets the origin's side of the ray.
    pub fn does_vector_intersect(
        &self,
        geometry: &GeometryCache,
        direction: DVec3,
        current_best: f64,
    ) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };

        let mut behind = false;
        let mut beyond = false;
        for ((normal, _), numerator) in CUBE_PLANES.iter().zip(self.cube_numerators) {
            let denominator = normal.dot(direction);
            if denominator == 0.0 {
                continue;
            }
            let t = numerator / denominator;
            if t < 0.0 {
                behind = true;
            } else {
                let point = origin + direction * t;
                if geometry.bounds.contains_point(point) {
                    if t < current_best {
                        return true;
                    }
                    beyond = true;
                }
            }
            if behind && beyond {
                return true;
            }
        }
        false
    }

    /// Exact nearest hit among this actor's faces, if any beats
    /// `current_best`.
    pub fn find_closest_intersection(
        &self,
        geometry: &GeometryCache,
        direction: DVec3,
        current_best: f64,
    ) -> Option<FaceHit> {
        let origin = self.origin?;

        let mut best = current_best;
        let mut result = None;
        for ((face_index, face), numerator) in
            geometry.faces.iter().enumerate().zip(&self.numerators)
        {
            let denominator = face.normal.dot(direction);
            if denominator == 0.0 {
                // Ray parallel to the face plane: no intersection.
                continue;
            }
            let t = numerator / denominator;
            if t <= 0.0 || t >= best {
                continue;
            }
            let point = origin + direction * t;
            if !face.bounds.contains_point(point) {
                continue;
            }
            let (pu, pv) = drop_axis(point, face.dropped);
            if !point_in_polygon(&face.u, &face.v, pu, pv) {
                continue;
            }
            best = t;
            result = Some(FaceHit {
                t,
                face: face_index,
                point,
            });
        }
        result
    }

    /// Shadow query: does any face intersect the ray with t in (0, 1)?
    ///
    /// The direction spans exactly the light-to-point distance, so t = 1 is
    /// the shaded point itself. `skip` excludes the face being shaded.
    pub fn is_intersection_within_one(
        &self,
        geometry: &GeometryCache,
        direction: DVec3,
        skip: Option<usize>,
    ) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };

        for ((face_index, face), numerator) in
            geometry.faces.iter().enumerate().zip(&self.numerators)
        {
            if skip == Some(face_index) {
                continue;
            }
            let denominator = face.normal.dot(direction);
            if denominator == 0.0 {
                continue;
            }
            let t = numerator / denominator;
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            let point = origin + direction * t;
            if !face.bounds.contains_point(point) {
                continue;
            }
            let (pu, pv) = drop_axis(point, face.dropped);
            if point_in_polygon(&face.u, &face.v, pu, pv) {
                return true;
            }
        }
        false
    }
}

impl Default for RayCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the largest absolute component.
fn dominant_axis(n: DVec3) -> usize {
    let a = n.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}

/// Project a point onto the two axes retained after dropping `axis`.
fn drop_axis(p: DVec3, axis: usize) -> (f64, f64) {
    match axis {
        0 => (p.y, p.z),
        1 => (p.x, p.z),
        _ => (p.x, p.y),
    }
}

/// Even-odd (crossing number) point-in-polygon test over the retained
/// coordinates.
fn point_in_polygon(u: &[f64], v: &[f64], pu: f64, pv: f64) -> bool {
    let mut inside = false;
    let mut j = u.len() - 1;
    for i in 0..u.len() {
        if (v[i] > pv) != (v[j] > pv) {
            let crossing = u[i] + (pv - v[i]) / (v[j] - v[i]) * (u[j] - u[i]);
            if pu < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
