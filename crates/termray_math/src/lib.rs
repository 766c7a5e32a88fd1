// Re-export the glam f64 types used throughout the renderer
pub use glam::{DMat3, DMat4, DVec3, IVec2};

mod aabb;
mod interval;
mod motion;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use motion::MotionMatrix;
pub use ray::Ray;
pub use transform::{rotate_about, rotate_vector};
