//! Wireframe line rendering.
//!
//! Projects actor edges through the camera projection into screen-space
//! segments. Segments and labels are plain data consumed by the external
//! character-rasterization stage; thickening and glyph choice happen there.

use termray_math::IVec2;
use termray_scene::{Color, Projection};

use crate::actor::Actor;

/// A visible line segment in integer screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSegment {
    pub a: IVec2,
    pub b: IVec2,
}

/// A text label anchored at a screen position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: IVec2,
    pub foreground: Color,
    pub background: Color,
}

/// Project every actor's edges, keeping the segments the camera can see.
pub fn render_wireframe(actors: &[Box<dyn Actor>], projection: &Projection) -> Vec<ScreenSegment> {
    let mut segments = Vec::new();
    for actor in actors {
        for (p1, p2) in actor.edges() {
            if let Some((a, b)) = projection.transform_line(p1, p2) {
                segments.push(ScreenSegment { a, b });
            }
        }
    }
    log::debug!("wireframe pass: {} visible segments", segments.len());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use termray_math::DVec3;
    use termray_scene::{Camera, IdAllocator, Material, Mesh};

    use crate::poly::PolyActor;
    use crate::sphere::SphereActor;

    fn scene(allocator: &IdAllocator) -> Vec<Box<dyn Actor>> {
        vec![
            Box::new(PolyActor::new(Mesh::quad(), Material::default(), allocator).unwrap()),
            Box::new(SphereActor::new(DVec3::ZERO, 1.0, Material::default(), allocator).unwrap()),
        ]
    }

    #[test]
    fn test_quad_produces_four_segments() {
        let allocator = IdAllocator::new();
        let actors = scene(&allocator);
        let camera = Camera::new(DVec3::new(0.0, 0.0, -10.0), DVec3::ZERO, DVec3::Y);
        let projection = Projection::new(&camera, 100, 100).unwrap();

        // The sphere contributes no edges; the quad contributes four.
        let segments = render_wireframe(&actors, &projection);
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_geometry_behind_camera_is_dropped() {
        let allocator = IdAllocator::new();
        let actors = scene(&allocator);
        let camera = Camera::new(
            DVec3::new(0.0, 0.0, -10.0),
            DVec3::new(0.0, 0.0, -20.0),
            DVec3::Y,
        );
        let projection = Projection::new(&camera, 100, 100).unwrap();

        let segments = render_wireframe(&actors, &projection);
        assert!(segments.is_empty());
    }
}
