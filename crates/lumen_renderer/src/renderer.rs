//! Whole-image rendering and display conversion.
//!
//! Buckets are traced in parallel on the rayon pool and stitched into a
//! linear-radiance [`ImageBuffer`]; [`color_to_rgba`] turns a pixel into
//! 8-bit display values.

use std::time::Instant;

use lumen_math::Spectrum;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::integrator::PathTracer;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a radiance value to 8-bit RGBA.
pub fn color_to_rgba(color: Spectrum) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Row-major image of linear radiance.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Spectrum>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Spectrum {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Spectrum) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }
}

/// Render the full image described by the tracer's config.
pub fn render(tracer: &PathTracer) -> ImageBuffer {
    let config = tracer.config();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, tracer);
            log::debug!("Bucket {} done", bucket.index);
            result
        })
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Bucket, EnvironmentLight, Lambertian, PinholeCamera, PointLight, RenderConfig, Scene, Vec3,
    };

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        let ground = scene.add_material(Lambertian::new(Spectrum::splat(0.5)));
        let ball = scene.add_material(Lambertian::new(Spectrum::new(0.7, 0.3, 0.3)));
        scene.add_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, ground);
        scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, ball);
        scene.add_light(PointLight::new(Vec3::new(1.0, 2.0, 0.0), Spectrum::splat(5.0)));
        scene.set_environment(EnvironmentLight::Hemisphere {
            radiance: Spectrum::splat(0.3),
        });
        scene
    }

    fn tracer(config: RenderConfig) -> PathTracer {
        let camera = PinholeCamera::new().with_resolution(config.width, config.height);
        PathTracer::new(lit_scene(), camera, config).unwrap()
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Spectrum::new(0.0, 1.0, 4.0)), [0, 255, 255, 255]);
        assert_eq!(color_to_rgba(Spectrum::splat(0.25)), [127, 127, 127, 255]);
    }

    #[test]
    fn test_write_bucket() {
        let mut image = ImageBuffer::new(4, 4);
        let bucket = Bucket::new(2, 1, 2, 2, 0);
        let pixels = vec![
            Spectrum::splat(1.0),
            Spectrum::splat(2.0),
            Spectrum::splat(3.0),
            Spectrum::splat(4.0),
        ];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(2, 1), Spectrum::splat(1.0));
        assert_eq!(image.get(3, 1), Spectrum::splat(2.0));
        assert_eq!(image.get(2, 2), Spectrum::splat(3.0));
        assert_eq!(image.get(3, 2), Spectrum::splat(4.0));
        assert_eq!(image.get(0, 0), Spectrum::ZERO);
        assert_eq!(image.to_rgba().len(), 4 * 4 * 4);
    }

    #[test]
    fn test_render_is_reproducible() {
        let config = RenderConfig::default()
            .with_resolution(24, 16)
            .with_quality(4, 3)
            .with_area_samples(2)
            .with_bucket_size(8)
            .with_seed(42);

        let first = render(&tracer(config.clone()));
        let second = render(&tracer(config));

        assert_eq!(first.width, 24);
        assert_eq!(first.pixels.len(), 24 * 16);
        assert_eq!(first, second);
        assert!(first.pixels.iter().any(|p| p.x > 0.0));
    }

    #[test]
    fn test_seed_changes_noise() {
        let config = RenderConfig::default()
            .with_resolution(16, 16)
            .with_quality(2, 3)
            .with_bucket_size(8);

        let a = render(&tracer(config.clone().with_seed(1)));
        let b = render(&tracer(config.with_seed(2)));
        assert_ne!(a, b);
    }
}
