//! World-to-screen projection with clipping, used by wireframe rendering
//! and view-window sizing.
//!
//! The pipeline is linear and stateless per call: world points are
//! expressed in an orthonormal eye basis (depth along eye Y), clipped
//! against the front/back planes, perspective-divided into normalized
//! coordinates, clipped against the four frustum edges, and finally mapped
//! to integer screen coordinates.

use termray_math::{DVec3, IVec2};
use thiserror::Error;

use crate::Camera;

const EPSILON: f64 = 1e-9;

/// Degenerate camera configurations rejected at construction.
#[derive(Error, Debug, PartialEq)]
pub enum ProjectionError {
    #[error("camera from and to points coincide")]
    CoincidentFromTo,

    #[error("camera up vector is zero")]
    DegenerateUp,

    #[error("camera up vector is colinear with the view direction")]
    UpColinearWithDirection,

    #[error("view angle must be positive, got {0}")]
    InvalidAngle(f64),

    #[error("zoom must be positive, got {0}")]
    InvalidZoom(f64),

    #[error("invalid clip range: front {front}, back {back}")]
    InvalidClipRange { front: f64, back: f64 },
}

/// Projection onto a screen of fixed integer size.
#[derive(Debug, Clone)]
pub struct Projection {
    from: DVec3,
    a: DVec3,
    b: DVec3,
    c: DVec3,
    front_clip: f64,
    back_clip: f64,
    h_scale: f64,
    v_scale: f64,
    center: IVec2,
    half_width: f64,
    half_height: f64,
}

impl Projection {
    /// Build a projection for a camera and a screen size, validating the
    /// camera configuration.
    pub fn new(camera: &Camera, width: u32, height: u32) -> Result<Self, ProjectionError> {
        let direction = camera.direction();
        if direction.length_squared() < EPSILON {
            return Err(ProjectionError::CoincidentFromTo);
        }
        if camera.up().length_squared() < EPSILON {
            return Err(ProjectionError::DegenerateUp);
        }
        if camera.horizontal_angle() <= EPSILON {
            return Err(ProjectionError::InvalidAngle(camera.horizontal_angle()));
        }
        if camera.vertical_angle() <= EPSILON {
            return Err(ProjectionError::InvalidAngle(camera.vertical_angle()));
        }
        if camera.zoom() <= EPSILON {
            return Err(ProjectionError::InvalidZoom(camera.zoom()));
        }
        if camera.front_clip() < 0.0 || camera.back_clip() <= camera.front_clip() {
            return Err(ProjectionError::InvalidClipRange {
                front: camera.front_clip(),
                back: camera.back_clip(),
            });
        }

        let b = direction.normalize();
        let a = camera.up().cross(b);
        if a.length_squared() < EPSILON {
            return Err(ProjectionError::UpColinearWithDirection);
        }
        let a = a.normalize();
        let c = b.cross(a);

        Ok(Self {
            from: camera.from(),
            a,
            b,
            c,
            front_clip: camera.front_clip(),
            back_clip: camera.back_clip(),
            h_scale: camera.zoom() / (camera.horizontal_angle().to_radians() / 2.0).tan(),
            v_scale: camera.zoom() / (camera.vertical_angle().to_radians() / 2.0).tan(),
            center: IVec2::new(width as i32 / 2, height as i32 / 2),
            half_width: width as f64 / 2.0,
            half_height: height as f64 / 2.0,
        })
    }

    /// Project a world-space segment to screen coordinates.
    ///
    /// Returns `None` at the first clip stage that rejects the segment.
    pub fn transform_line(&self, p1: DVec3, p2: DVec3) -> Option<(IVec2, IVec2)> {
        let mut e1 = self.to_eye(p1);
        let mut e2 = self.to_eye(p2);

        // Depth clip: eye Y is the distance along the view direction.
        if e1.y < self.front_clip && e2.y < self.front_clip {
            return None;
        }
        if e1.y > self.back_clip && e2.y > self.back_clip {
            return None;
        }
        if e1.y < self.front_clip {
            e1 = clip_at(e1, e2, self.front_clip, |v| v.y);
        } else if e2.y < self.front_clip {
            e2 = clip_at(e2, e1, self.front_clip, |v| v.y);
        }
        if e1.y > self.back_clip {
            e1 = clip_at(e1, e2, self.back_clip, |v| v.y);
        } else if e2.y > self.back_clip {
            e2 = clip_at(e2, e1, self.back_clip, |v| v.y);
        }

        let mut n1 = self.to_normalized(e1);
        let mut n2 = self.to_normalized(e2);

        // Frustum-edge clip, x planes before z planes.
        if n1.x < -1.0 && n2.x < -1.0 {
            return None;
        }
        if n1.x > 1.0 && n2.x > 1.0 {
            return None;
        }
        if n1.x < -1.0 {
            n1 = clip_at(n1, n2, -1.0, |v| v.x);
        } else if n2.x < -1.0 {
            n2 = clip_at(n2, n1, -1.0, |v| v.x);
        }
        if n1.x > 1.0 {
            n1 = clip_at(n1, n2, 1.0, |v| v.x);
        } else if n2.x > 1.0 {
            n2 = clip_at(n2, n1, 1.0, |v| v.x);
        }

        if n1.z < -1.0 && n2.z < -1.0 {
            return None;
        }
        if n1.z > 1.0 && n2.z > 1.0 {
            return None;
        }
        if n1.z < -1.0 {
            n1 = clip_at(n1, n2, -1.0, |v| v.z);
        } else if n2.z < -1.0 {
            n2 = clip_at(n2, n1, -1.0, |v| v.z);
        }
        if n1.z > 1.0 {
            n1 = clip_at(n1, n2, 1.0, |v| v.z);
        } else if n2.z > 1.0 {
            n2 = clip_at(n2, n1, 1.0, |v| v.z);
        }

        Some((self.to_screen(n1), self.to_screen(n2)))
    }

    /// Express a world point in the orthonormal eye basis.
    fn to_eye(&self, p: DVec3) -> DVec3 {
        let rel = p - self.from;
        DVec3::new(rel.dot(self.a), rel.dot(self.b), rel.dot(self.c))
    }

    /// Perspective divide into normalized coordinates. `n.y` keeps the eye
    /// depth; nothing downstream reads it.
    fn to_normalized(&self, e: DVec3) -> DVec3 {
        DVec3::new(
            self.h_scale * e.x / e.y,
            e.y,
            self.v_scale * e.z / e.y,
        )
    }

    /// Map normalized coordinates to integer screen coordinates. Screen
    /// rows grow downward, so the vertical axis flips.
    fn to_screen(&self, n: DVec3) -> IVec2 {
        IVec2::new(
            self.center.x + (self.half_width * n.x).round() as i32,
            self.center.y - (self.half_height * n.z).round() as i32,
        )
    }
}

/// Linear interpolation onto a clip plane along the given axis:
/// mu = (plane - axis(a)) / (axis(b) - axis(a)).
fn clip_at(a: DVec3, b: DVec3, plane: f64, axis: impl Fn(DVec3) -> f64) -> DVec3 {
    let mu = (plane - axis(a)) / (axis(b) - axis(a));
    a + (b - a) * mu
}
