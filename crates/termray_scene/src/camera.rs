//! Viewpoint state and movement operators.
//!
//! All camera rotations are one-shot rotation-about-unit-axis transforms
//! applied to a single vector per input event; turns pivot at the eye
//! point. `up` is re-orthogonalized against the view direction whenever an
//! operation can break their perpendicularity; turns about the up axis
//! itself cannot, and skip the fix-up.

use termray_math::{rotate_about, rotate_vector, DVec3};

/// One turn step in radians (1 degree); callers scale by a step count.
const TURN_STEP: f64 = std::f64::consts::PI / 180.0;

const DEGENERATE: f64 = 1e-12;

/// Perspective camera: eye point, look-at point, up vector, view angles,
/// zoom and clip planes. Validation of the configuration happens when a
/// [`crate::Projection`] is built from it.
#[derive(Debug, Clone)]
pub struct Camera {
    from: DVec3,
    to: DVec3,
    up: DVec3,
    horizontal_angle: f64,
    vertical_angle: f64,
    zoom: f64,
    front_clip: f64,
    back_clip: f64,
    initial: (DVec3, DVec3, DVec3),
}

impl Camera {
    /// Create a camera with default angles (90 degrees), zoom 1 and clip
    /// range 0.1..1000.
    pub fn new(from: DVec3, to: DVec3, up: DVec3) -> Self {
        let mut camera = Self {
            from,
            to,
            up,
            horizontal_angle: 90.0,
            vertical_angle: 90.0,
            zoom: 1.0,
            front_clip: 0.1,
            back_clip: 1000.0,
            initial: (from, to, up),
        };
        camera.orthogonalize_up();
        camera.initial = (camera.from, camera.to, camera.up);
        camera
    }

    /// Set the horizontal and vertical view angles in degrees.
    pub fn with_angles(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_angle = horizontal;
        self.vertical_angle = vertical;
        self
    }

    /// Set the zoom factor.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the front and back clip distances.
    pub fn with_clip(mut self, front: f64, back: f64) -> Self {
        self.front_clip = front;
        self.back_clip = back;
        self
    }

    pub fn from(&self) -> DVec3 {
        self.from
    }

    pub fn to(&self) -> DVec3 {
        self.to
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    /// The (unnormalized) view direction `to - from`.
    pub fn direction(&self) -> DVec3 {
        self.to - self.from
    }

    /// The side axis `direction x up` (points to the camera's left).
    pub fn side(&self) -> DVec3 {
        self.direction().cross(self.up)
    }

    pub fn horizontal_angle(&self) -> f64 {
        self.horizontal_angle
    }

    pub fn vertical_angle(&self) -> f64 {
        self.vertical_angle
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn front_clip(&self) -> f64 {
        self.front_clip
    }

    pub fn back_clip(&self) -> f64 {
        self.back_clip
    }

    /// Restore the pose the camera was constructed with.
    pub fn reset(&mut self) {
        let (from, to, up) = self.initial;
        self.from = from;
        self.to = to;
        self.up = up;
    }

    /// Move along the normalized view direction.
    pub fn move_forward(&mut self, distance: f64) {
        self.translate(self.direction().normalize() * distance);
    }

    /// Move against the normalized view direction.
    pub fn move_backward(&mut self, distance: f64) {
        self.move_forward(-distance);
    }

    /// Move along the up vector.
    pub fn move_up(&mut self, distance: f64) {
        self.translate(self.up.normalize() * distance);
    }

    /// Move against the up vector.
    pub fn move_down(&mut self, distance: f64) {
        self.move_up(-distance);
    }

    /// Strafe along the side axis.
    pub fn strafe_left(&mut self, distance: f64) {
        self.translate(self.side().normalize() * distance);
    }

    /// Strafe against the side axis.
    pub fn strafe_right(&mut self, distance: f64) {
        self.strafe_left(-distance);
    }

    /// Turn the view direction about the up axis, toward the right.
    ///
    /// Rotating about `up` cannot change the direction-up perpendicularity,
    /// so no re-orthogonalization happens here.
    pub fn turn_right(&mut self, steps: f64) {
        self.to = rotate_about(self.to, self.from, self.up.normalize(), steps * TURN_STEP);
    }

    /// Turn the view direction about the up axis, toward the left.
    pub fn turn_left(&mut self, steps: f64) {
        self.turn_right(-steps);
    }

    /// Tilt the view direction upward about the side axis.
    pub fn turn_up(&mut self, steps: f64) {
        let side = self.side();
        if side.length_squared() < DEGENERATE {
            return;
        }
        self.to = rotate_about(self.to, self.from, side.normalize(), steps * TURN_STEP);
        self.orthogonalize_up();
    }

    /// Tilt the view direction downward about the side axis.
    pub fn turn_down(&mut self, steps: f64) {
        self.turn_up(-steps);
    }

    /// Roll the up vector counter-clockwise about the view direction.
    pub fn spin_counterclockwise(&mut self, steps: f64) {
        self.up = rotate_vector(self.up, self.direction().normalize(), steps * TURN_STEP);
    }

    /// Roll the up vector clockwise about the view direction.
    pub fn spin_clockwise(&mut self, steps: f64) {
        self.spin_counterclockwise(-steps);
    }

    /// Turn 180 degrees about the up axis.
    pub fn about_face(&mut self) {
        self.to = rotate_about(
            self.to,
            self.from,
            self.up.normalize(),
            std::f64::consts::PI,
        );
    }

    fn translate(&mut self, delta: DVec3) {
        self.from += delta;
        self.to += delta;
    }

    /// Rebuild `up` perpendicular to the view direction, preserving its
    /// general orientation. Skipped when either vector is degenerate; the
    /// projection constructor reports those configurations as errors.
    fn orthogonalize_up(&mut self) {
        let direction = self.direction();
        let side = direction.cross(self.up);
        if side.length_squared() < DEGENERATE {
            return;
        }
        self.up = side.cross(direction).normalize();
    }
}
