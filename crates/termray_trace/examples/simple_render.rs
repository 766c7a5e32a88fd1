//! Simple ray casting example.
//!
//! Renders a checkered floor, a sphere and a cube lit by two point lights,
//! saves the frame to PPM, and prints the wireframe segment count for the
//! same viewpoint.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Result;
use termray_trace::{
    color_to_rgb, render, render_wireframe, Actor, Camera, Color, DVec3, IdAllocator, ImageBuffer,
    LightSource, Material, Mesh, PlaneActor, PolyActor, Projection, RenderConfig, SphereActor,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("termray simple render");

    let start = std::time::Instant::now();
    let mut actors = build_scene()?;
    log::info!("scene built in {:?}", start.elapsed());

    let lights = [
        LightSource::white(DVec3::new(8.0, 12.0, 8.0)),
        LightSource::new(DVec3::new(-6.0, 10.0, -2.0), Color::new(0.6, 0.6, 0.8)),
    ];

    let camera = Camera::new(
        DVec3::new(0.0, 4.0, 12.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::Y,
    )
    .with_angles(70.0, 70.0)
    .with_clip(0.1, 200.0);

    let config = RenderConfig {
        background: Color::new(0.05, 0.05, 0.1),
    };

    let mut image = ImageBuffer::new(640, 480);
    let start = std::time::Instant::now();
    render(&mut actors, &lights, &camera, &config, &mut image);
    log::info!("rendered {}x{} in {:?}", image.width, image.height, start.elapsed());

    save_ppm(&image, "output.ppm")?;
    log::info!("saved to output.ppm");

    // Same scene through the wireframe path.
    let projection = Projection::new(&camera, 80, 24)?;
    let segments = render_wireframe(&actors, &projection);
    log::info!("wireframe: {} visible segments on an 80x24 screen", segments.len());

    Ok(())
}

fn build_scene() -> Result<Vec<Box<dyn Actor>>> {
    let allocator = IdAllocator::new();
    let mut actors: Vec<Box<dyn Actor>> = Vec::new();

    // Checkered floor
    actors.push(Box::new(
        PlaneActor::new(
            DVec3::ZERO,
            DVec3::Y,
            Material::matte(Color::new(0.9, 0.9, 0.85)),
            Material::matte(Color::new(0.15, 0.15, 0.2)),
            &allocator,
        )?
        .with_cell(2.0),
    ));

    // A shiny sphere
    actors.push(Box::new(SphereActor::new(
        DVec3::new(-2.5, 1.5, 0.0),
        1.5,
        Material::shiny(Color::new(0.2, 0.4, 0.8)),
        &allocator,
    )?));

    // A cube mesh, lifted onto the floor and turned a little
    let mut cube = PolyActor::new(
        Mesh::cube(1.0),
        Material::shiny(Color::new(0.8, 0.3, 0.2)),
        &allocator,
    )?;
    cube.motion_mut().rotate_y(0.4);
    cube.motion_mut().move_to(DVec3::new(2.5, 1.0, 0.0));
    actors.push(Box::new(cube));

    Ok(actors)
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgb = color_to_rgb(image.get(x, y));
            writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }
    }

    Ok(())
}
