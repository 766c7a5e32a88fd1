//! Actor-local affine motion: scale, rotate, translate, with an exact inverse.
//!
//! Unlike the one-shot camera rotations in [`crate::transform`], a
//! `MotionMatrix` is a persistent per-actor transform that is applied to
//! every vertex every frame, so it keeps scale, rotation and translation
//! decomposed. That makes the inverse analytic (transpose the rotation,
//! negate the translation, divide by the scale) instead of requiring a
//! general matrix inversion.

use glam::{DMat3, DVec3};

/// Decomposed affine transform applied in a fixed order:
/// scale, then rotate, then translate.
///
/// `apply` and `unapply` are exact inverses to floating-point precision for
/// any sequence of mutating calls, provided every scale component is
/// non-zero. The `version` counter increments on every mutation so caches
/// keyed on it can tell when derived geometry went stale.
#[derive(Debug, Clone)]
pub struct MotionMatrix {
    scale: DVec3,
    rotation: DMat3,
    translation: DVec3,
    identity: bool,
    version: u64,
}

impl MotionMatrix {
    /// The identity motion: unit scale, no rotation, no translation.
    pub fn new() -> Self {
        Self {
            scale: DVec3::ONE,
            rotation: DMat3::IDENTITY,
            translation: DVec3::ZERO,
            identity: true,
            version: 0,
        }
    }

    /// Fast-path flag: true until the first mutating call.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Monotonically increasing counter, bumped by every mutating call.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The per-axis scale factors.
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// The translation component.
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    fn touch(&mut self) {
        self.identity = false;
        self.version += 1;
    }

    /// Set the per-axis scale. Components must be non-zero for `unapply`
    /// to remain defined.
    pub fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
        self.touch();
    }

    /// Compose a rotation about the X axis into the cached matrix.
    ///
    /// Composition order is the caller's responsibility: each call applies
    /// its rotation after all previously composed ones.
    pub fn rotate_x(&mut self, angle: f64) {
        self.rotation = DMat3::from_rotation_x(angle) * self.rotation;
        self.touch();
    }

    /// Compose a rotation about the Y axis into the cached matrix.
    pub fn rotate_y(&mut self, angle: f64) {
        self.rotation = DMat3::from_rotation_y(angle) * self.rotation;
        self.touch();
    }

    /// Compose a rotation about the Z axis into the cached matrix.
    pub fn rotate_z(&mut self, angle: f64) {
        self.rotation = DMat3::from_rotation_z(angle) * self.rotation;
        self.touch();
    }

    /// Set the translation to an absolute position.
    pub fn move_to(&mut self, position: DVec3) {
        self.translation = position;
        self.touch();
    }

    /// Offset the translation by a delta.
    pub fn move_by(&mut self, delta: DVec3) {
        self.translation += delta;
        self.touch();
    }

    /// Replace the rotation with one mapping the `from` basis pair onto the
    /// `to` basis pair.
    ///
    /// The rotation is solved as two sequential single-axis rotations (yaw
    /// about Y, then pitch about X, both via `atan2`) for each frame; the
    /// from-frame matrix is transposed (its inverse) and composed with the
    /// to-frame matrix. Two axes cannot represent roll about the normal, so
    /// the up vectors are constrained to the no-roll solution; each pair
    /// must be perpendicular.
    ///
    /// Precondition: the rotation must still be identity. `align` replaces
    /// the rotation outright, so composing it with prior `rotate_*` calls
    /// is unsupported.
    pub fn align(&mut self, from_normal: DVec3, from_up: DVec3, to_normal: DVec3, to_up: DVec3) {
        debug_assert!(self.rotation == DMat3::IDENTITY);
        debug_assert!(from_normal.dot(from_up).abs() < 1e-9);
        debug_assert!(to_normal.dot(to_up).abs() < 1e-9);

        self.rotation = frame_rotation(to_normal) * frame_rotation(from_normal).transpose();
        self.touch();
    }

    /// Transform a point: translate(rotate(scale(p))).
    pub fn apply(&self, p: DVec3) -> DVec3 {
        if self.identity {
            return p;
        }
        self.rotation * (self.scale * p) + self.translation
    }

    /// Transform a direction: rotate(scale(v)), without translation.
    pub fn apply_vector(&self, v: DVec3) -> DVec3 {
        if self.identity {
            return v;
        }
        self.rotation * (self.scale * v)
    }

    /// Exactly reverse `apply`. Requires non-zero scale components.
    pub fn unapply(&self, p: DVec3) -> DVec3 {
        if self.identity {
            return p;
        }
        (self.rotation.transpose() * (p - self.translation)) / self.scale
    }
}

impl Default for MotionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation carrying the canonical +Z/+Y basis onto the frame whose normal
/// is `n`, decomposed as yaw about Y after pitch about X.
fn frame_rotation(n: DVec3) -> DMat3 {
    let yaw = n.x.atan2(n.z);
    let pitch = (-n.y).atan2((n.x * n.x + n.z * n.z).sqrt());
    DMat3::from_rotation_y(yaw) * DMat3::from_rotation_x(pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_passthrough() {
        let motion = MotionMatrix::new();

        assert!(motion.is_identity());
        assert_eq!(motion.version(), 0);
        assert_eq!(motion.apply(DVec3::new(1.0, 2.0, 3.0)), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(motion.unapply(DVec3::new(1.0, 2.0, 3.0)), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut motion = MotionMatrix::new();

        motion.set_scale(DVec3::new(2.0, 2.0, 2.0));
        assert_eq!(motion.version(), 1);
        assert!(!motion.is_identity());

        motion.rotate_y(0.1);
        motion.move_by(DVec3::X);
        assert_eq!(motion.version(), 3);
    }

    #[test]
    fn test_apply_order_scale_rotate_translate() {
        let mut motion = MotionMatrix::new();
        motion.set_scale(DVec3::new(2.0, 1.0, 1.0));
        motion.rotate_z(FRAC_PI_2);
        motion.move_by(DVec3::new(0.0, 0.0, 5.0));

        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (0,2,5)
        let p = motion.apply(DVec3::X);
        assert!((p - DVec3::new(0.0, 2.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let mut motion = MotionMatrix::new();
        motion.set_scale(DVec3::new(2.0, 3.0, 0.5));
        motion.rotate_x(0.3);
        motion.rotate_y(-1.2);
        motion.rotate_z(2.7);
        motion.move_to(DVec3::new(-4.0, 10.0, 0.25));

        for p in [
            DVec3::ZERO,
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-7.5, 0.001, 42.0),
        ] {
            let back = motion.unapply(motion.apply(p));
            assert!((back - p).length() < 1e-9, "round trip failed for {p:?}: {back:?}");
        }
    }

    #[test]
    fn test_apply_vector_ignores_translation() {
        let mut motion = MotionMatrix::new();
        motion.move_to(DVec3::new(100.0, 0.0, 0.0));

        assert_eq!(motion.apply_vector(DVec3::Y), DVec3::Y);
    }

    #[test]
    fn test_align_maps_normal() {
        let mut motion = MotionMatrix::new();
        motion.align(DVec3::Y, DVec3::Z, DVec3::X, DVec3::Y);

        let mapped = motion.apply(DVec3::Y);
        assert!((mapped - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_align_round_trip() {
        let to_normal = DVec3::new(1.0, 2.0, -0.5).normalize();
        // Any unit vector perpendicular to the normal satisfies the contract.
        let to_up = to_normal.cross(DVec3::X).normalize();

        let mut motion = MotionMatrix::new();
        motion.align(DVec3::Y, DVec3::Z, to_normal, to_up);
        motion.move_to(DVec3::new(3.0, -1.0, 2.0));

        let p = DVec3::new(0.7, 0.0, -2.2);
        let back = motion.unapply(motion.apply(p));
        assert!((back - p).length() < 1e-9);

        // Points in the local y=0 plane land on the plane through the
        // translation with the target normal.
        let world = motion.apply(p);
        let offset = (world - motion.translation()).dot(to_normal);
        assert!(offset.abs() < 1e-9);
    }
}
