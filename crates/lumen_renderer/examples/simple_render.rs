//! Simple path tracer example.
//!
//! Renders a small scene with every built-in material and light and saves it
//! as a PNG. An optional first argument names a JSON render config.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example simple_render -- config.json
//! ```

use anyhow::Context;
use lumen_renderer::{
    render, DiffuseLight, EnvironmentLight, Glass, Lambertian, Mirror, PathTracer, PinholeCamera,
    PointLight, RectangleLight, RenderConfig, Scene, Spectrum, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => RenderConfig::default().with_quality(64, 8),
    };

    let camera = PinholeCamera::new()
        .with_position(
            Vec3::new(0.0, 1.0, 4.0), // look_from
            Vec3::new(0.0, 0.5, 0.0), // look_at
            Vec3::new(0.0, 1.0, 0.0), // vup
        )
        .with_fov(45.0)
        .with_resolution(config.width, config.height);

    let tracer = PathTracer::new(build_scene(), camera, config)?;
    let image = render(&tracer);

    let output = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer size mismatch")?;

    let filename = "output.png";
    output.save(filename).context("Failed to save image")?;
    log::info!("Saved to {filename}");

    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Spectrum::new(0.5, 0.5, 0.5)));
    let diffuse = scene.add_material(Lambertian::new(Spectrum::new(0.7, 0.25, 0.2)));
    let mirror = scene.add_material(Mirror::new(Spectrum::new(0.9, 0.9, 0.85)));
    let glass = scene.add_material(Glass::new(1.5));
    let lamp = scene.add_material(DiffuseLight::new(Spectrum::new(4.0, 3.5, 2.5)));

    // Ground
    scene.add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground);

    // Three main spheres
    scene.add_sphere(Vec3::new(-1.1, 0.5, 0.0), 0.5, diffuse);
    scene.add_sphere(Vec3::new(0.0, 0.5, -0.6), 0.5, mirror);
    scene.add_sphere(Vec3::new(1.1, 0.5, 0.0), 0.5, glass);

    // Small glowing sphere
    scene.add_sphere(Vec3::new(0.4, 0.15, 0.9), 0.15, lamp);

    // Overhead panel facing down
    scene.add_light(RectangleLight::new(
        Vec3::new(-0.75, 3.0, -0.75),
        Vec3::new(1.5, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.5),
        Spectrum::splat(6.0),
    ));
    scene.add_light(PointLight::new(Vec3::new(-3.0, 2.5, 2.0), Spectrum::splat(8.0)));

    scene.set_environment(EnvironmentLight::Hemisphere {
        radiance: Spectrum::new(0.25, 0.3, 0.4),
    });

    log::info!("Created {} objects", scene.len());
    scene
}
