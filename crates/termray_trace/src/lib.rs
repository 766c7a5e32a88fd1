//! termray renderer core - CPU ray casting
//!
//! Renders a scene of actors (polygon meshes, spheres, infinite planes) lit
//! by point lights into an RGB pixel buffer, or projects it into
//! screen-space line segments for wireframe display. Terminal
//! rasterization, mesh parsing and the frame loop live outside this crate.

mod actor;
mod cache;
mod plane;
mod poly;
mod sphere;
mod tracer;
mod wireframe;

pub use actor::{Actor, Hit};
pub use cache::{CacheState, FaceHit, GeometryCache, RayCache};
pub use plane::PlaneActor;
pub use poly::PolyActor;
pub use sphere::SphereActor;
pub use tracer::{color_to_rgb, render, ImageBuffer, RenderConfig};
pub use wireframe::{render_wireframe, Label, ScreenSegment};

/// Re-export math and scene types used at the API surface
pub use termray_math::{Aabb, DVec3, Interval, IVec2, MotionMatrix, Ray};
pub use termray_scene::{
    Camera, Color, IdAllocator, IdError, IdRange, LightSource, Material, Mesh, Projection,
};
