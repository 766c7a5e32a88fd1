// One-shot rotation helpers for camera movement.
//
// These build a transient 4x4 affine rotation about an arbitrary unit axis
// (Rodrigues' formula, via glam) and apply it to a single vector. Actor
// motion uses the decomposed MotionMatrix instead, which stays cheaply
// invertible; these transforms are applied once per input event and then
// discarded.

use glam::{DMat4, DVec3};

/// Rotate a point about a unit axis anchored at a pivot.
pub fn rotate_about(p: DVec3, pivot: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    let m = DMat4::from_translation(pivot)
        * DMat4::from_axis_angle(axis, angle)
        * DMat4::from_translation(-pivot);
    m.transform_point3(p)
}

/// Rotate a direction vector about a unit axis through the origin.
pub fn rotate_vector(v: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    DMat4::from_axis_angle(axis, angle).transform_vector3(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let rotated = rotate_vector(DVec3::X, DVec3::Z, FRAC_PI_2);
        assert!((rotated - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_rotate_about_pivot() {
        // Rotating (2,0,0) half a turn about the Y axis through (1,0,0)
        // lands on (0,0,0).
        let rotated = rotate_about(DVec3::new(2.0, 0.0, 0.0), DVec3::X, DVec3::Y, PI);
        assert!(rotated.length() < 1e-12);
    }

    #[test]
    fn test_rotate_about_fixes_pivot() {
        let pivot = DVec3::new(3.0, -2.0, 7.0);
        let rotated = rotate_about(pivot, pivot, DVec3::new(0.0, 1.0, 0.0), 1.234);
        assert!((rotated - pivot).length() < 1e-12);
    }
}
