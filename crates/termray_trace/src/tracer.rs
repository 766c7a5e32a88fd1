//! Parallel ray casting renderer.
//!
//! Each frame runs two phases. First, every actor's cache layers are
//! refreshed for the eye point and the light positions, in parallel across
//! actors; this must fully complete before shading starts because shading
//! reads what preparation writes. Then pixels are shaded in parallel across
//! rows, each row writing a disjoint slice of the output buffer, with all
//! cache access read-only.

use rayon::prelude::*;

use termray_math::Ray;
use termray_scene::{Camera, Color, LightSource};

use crate::actor::{Actor, Hit};

/// Distance from the eye to the virtual image plane. The plane's extents
/// scale with it, so the value only fixes the parameterization.
const IMAGE_PLANE_DISTANCE: f64 = 1.0;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color for rays that strike nothing
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
        }
    }
}

/// Render one frame into the image buffer.
pub fn render(
    actors: &mut [Box<dyn Actor>],
    lights: &[LightSource],
    camera: &Camera,
    config: &RenderConfig,
    image: &mut ImageBuffer,
) {
    let origin = camera.from();

    // Preparation phase: a full barrier before any pixel is shaded.
    actors
        .par_iter_mut()
        .for_each(|actor| actor.prepare_for_ray_render(origin, lights));
    let actors: &[Box<dyn Actor>] = actors;

    // Image plane basis: depth along B, A to the right, C up, matching the
    // projection's eye basis.
    let b = camera.direction().normalize();
    let a = camera.up().cross(b).normalize();
    let c = b.cross(a);
    let half_width =
        IMAGE_PLANE_DISTANCE * (camera.horizontal_angle().to_radians() / 2.0).tan() / camera.zoom();
    let half_height =
        IMAGE_PLANE_DISTANCE * (camera.vertical_angle().to_radians() / 2.0).tan() / camera.zoom();
    let plane_center = origin + b * IMAGE_PLANE_DISTANCE;

    let width = image.width as usize;
    let height = image.height as usize;

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| {
            let v = 1.0 - (row as f64 + 0.5) / height as f64 * 2.0;
            for (column, pixel) in pixels.iter_mut().enumerate() {
                let u = (column as f64 + 0.5) / width as f64 * 2.0 - 1.0;
                let target = plane_center + a * (u * half_width) + c * (v * half_height);
                let ray = Ray::new(origin, target - origin);
                *pixel = shade(&ray, actors, lights, config);
            }
        });
}

/// Nearest hit across all actors, then the flat shading model.
fn shade(
    ray: &Ray,
    actors: &[Box<dyn Actor>],
    lights: &[LightSource],
    config: &RenderConfig,
) -> Color {
    let mut best = f64::INFINITY;
    let mut nearest: Option<(usize, Hit)> = None;
    for (index, actor) in actors.iter().enumerate() {
        if let Some(hit) = actor.ray_intersect(ray, best) {
            best = hit.proxy;
            nearest = Some((index, hit));
        }
    }

    let Some((index, hit)) = nearest else {
        return config.background;
    };

    // Flat model: ambient and diffuse accumulate once, then each
    // unoccluded light adds its specular contribution. Light contributions
    // are not scaled by incidence angle.
    let material = actors[index].shade_at(hit.point, hit.id);
    let mut color = material.ambient + material.diffuse;

    for (light_index, light) in lights.iter().enumerate() {
        let shadow_ray = Ray::new(light.position, hit.point - light.position);
        let occluded = actors
            .iter()
            .any(|actor| actor.casts_shadow(light_index, &shadow_ray, hit.id));
        if !occluded {
            color += material.specular * light.color;
        }
    }

    color
}

/// Convert a color to 8-bit RGB, clamping each channel to [0, 1].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let r = (255.0 * color.x.clamp(0.0, 1.0)) as u8;
    let g = (255.0 * color.y.clamp(0.0, 1.0)) as u8;
    let b = (255.0 * color.z.clamp(0.0, 1.0)) as u8;
    [r, g, b]
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGB bytes (for display or saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 3) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termray_math::DVec3;
    use termray_scene::{IdAllocator, Material, Mesh};

    use crate::poly::PolyActor;
    use crate::sphere::SphereActor;

    fn facing_camera() -> Camera {
        Camera::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y)
    }

    #[test]
    fn test_center_pixel_hits_quad() {
        let allocator = IdAllocator::new();
        let material = Material::new(
            Color::splat(0.1),
            Color::splat(0.3),
            Color::splat(0.2),
            8.0,
        );
        let mut actors: Vec<Box<dyn Actor>> = vec![Box::new(
            PolyActor::new(Mesh::quad(), material, &allocator).unwrap(),
        )];
        let lights = [LightSource::white(DVec3::new(0.0, 0.0, 10.0))];

        let mut image = ImageBuffer::new(3, 3);
        render(
            &mut actors,
            &lights,
            &facing_camera(),
            &RenderConfig::default(),
            &mut image,
        );

        // Center ray runs straight down the view axis into the quad; the
        // light sits on the same side as the camera, so it is unoccluded:
        // ambient + diffuse + specular.
        let expected = Color::splat(0.1) + Color::splat(0.3) + Color::splat(0.2);
        assert!((image.get(1, 1) - expected).length() < 1e-9);
    }

    #[test]
    fn test_miss_yields_background() {
        let allocator = IdAllocator::new();
        let mut actors: Vec<Box<dyn Actor>> = vec![Box::new(
            SphereActor::new(DVec3::ZERO, 0.1, Material::default(), &allocator).unwrap(),
        )];

        let config = RenderConfig {
            background: Color::new(0.2, 0.0, 0.2),
        };
        let mut image = ImageBuffer::new(3, 3);
        render(&mut actors, &[], &facing_camera(), &config, &mut image);

        // A corner ray misses the tiny sphere.
        assert_eq!(image.get(0, 0), config.background);
    }

    #[test]
    fn test_occluded_light_adds_no_specular() {
        let allocator = IdAllocator::new();
        let material = Material::new(
            Color::splat(0.1),
            Color::splat(0.3),
            Color::splat(0.2),
            8.0,
        );

        // A quad facing the camera, with an occluding sphere between the
        // light behind it and the quad.
        let mut actors: Vec<Box<dyn Actor>> = vec![
            Box::new(PolyActor::new(Mesh::quad(), material, &allocator).unwrap()),
            Box::new(
                SphereActor::new(
                    DVec3::new(0.0, 0.0, -5.0),
                    1.0,
                    Material::default(),
                    &allocator,
                )
                .unwrap(),
            ),
        ];
        let lights = [LightSource::white(DVec3::new(0.0, 0.0, -10.0))];

        let mut image = ImageBuffer::new(3, 3);
        render(
            &mut actors,
            &lights,
            &facing_camera(),
            &RenderConfig::default(),
            &mut image,
        );

        // Only ambient and diffuse reach the shadowed center pixel.
        let expected = Color::splat(0.1) + Color::splat(0.3);
        assert!((image.get(1, 1) - expected).length() < 1e-9);
    }

    #[test]
    fn test_nearest_actor_wins() {
        let allocator = IdAllocator::new();
        let near = Material::new(Color::splat(0.5), Color::ZERO, Color::ZERO, 1.0);
        let far = Material::new(Color::splat(0.9), Color::ZERO, Color::ZERO, 1.0);

        let mut behind = PolyActor::new(Mesh::quad(), far, &allocator).unwrap();
        behind.motion_mut().move_by(DVec3::new(0.0, 0.0, -3.0));

        let mut actors: Vec<Box<dyn Actor>> = vec![
            Box::new(behind),
            Box::new(SphereActor::new(DVec3::ZERO, 0.5, near, &allocator).unwrap()),
        ];

        let mut image = ImageBuffer::new(3, 3);
        render(
            &mut actors,
            &[],
            &facing_camera(),
            &RenderConfig::default(),
            &mut image,
        );

        // The sphere sits in front of the quad on the view axis.
        assert!((image.get(1, 1) - Color::splat(0.5)).length() < 1e-9);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::new(2.0, -1.0, 0.5)), [255, 0, 127]);
    }

    #[test]
    fn test_image_buffer_round_trip() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Color::ONE);

        assert_eq!(image.get(1, 0), Color::ONE);
        let bytes = image.to_rgb8();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[3..6], &[255, 255, 255]);
    }
}
