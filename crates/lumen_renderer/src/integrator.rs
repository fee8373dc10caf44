//! Recursive Monte Carlo path tracing.
//!
//! Each bounce gathers direct light with shadow rays, then continues the path
//! along a BSDF-sampled direction. Paths end at `max_depth` or by Russian
//! roulette on their throughput.

use lumen_core::{ConfigResult, RenderConfig};
use lumen_math::{luma, Frame, Ray, Spectrum, Vec2, Vec3};
use rand::RngCore;

use crate::camera::Camera;
use crate::gen_f32;
use crate::hittable::Hittable;
use crate::light::Light;
use crate::material::Bsdf;
use crate::sampler::{RectUniform, Sampler};
use crate::scene::Scene;

/// Radiance estimator for a scene seen through a camera.
///
/// Holds only shared, read-only state; callers supply the random generator.
pub struct PathTracer {
    scene: Scene,
    camera: Box<dyn Camera>,
    config: RenderConfig,
}

impl PathTracer {
    /// Create a tracer, rejecting configs that cannot produce an image.
    pub fn new(scene: Scene, camera: impl Camera + 'static, config: RenderConfig) -> ConfigResult<Self> {
        config.validate()?;
        log::debug!(
            "Path tracer: {} objects, {} spp, max depth {}",
            scene.len(),
            config.samples_per_pixel,
            config.max_depth
        );
        Ok(Self {
            scene,
            camera: Box::new(camera),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Estimate the radiance through pixel `(x, y)`.
    ///
    /// With one sample per pixel the ray goes through the pixel center and no
    /// random number is drawn for its position.
    pub fn trace_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Spectrum {
        let size = Vec2::new(self.config.width as f32, self.config.height as f32);
        let pixel = Vec2::new(x as f32, y as f32);
        let samples = self.config.samples_per_pixel;

        if samples == 1 {
            let ray = self.camera.generate_ray((pixel + Vec2::splat(0.5)) / size);
            let radiance = self.trace_ray(&ray, rng);
            log::trace!("pixel ({x}, {y}): {:?} -> {radiance}", ray.dir);
            return radiance;
        }

        let jitter = RectUniform::new(Vec2::ONE);
        let mut total = Spectrum::ZERO;
        for _ in 0..samples {
            let (offset, _) = jitter.sample(rng);
            let ray = self.camera.generate_ray((pixel + offset) / size);
            let radiance = self.trace_ray(&ray, rng);
            log::trace!("pixel ({x}, {y}): {:?} -> {radiance}", ray.dir);
            total += radiance;
        }

        total / samples as f32
    }

    /// Estimate the radiance arriving at `ray.origin` from along `ray.dir`.
    pub fn trace_ray(&self, ray: &Ray, rng: &mut dyn RngCore) -> Spectrum {
        let trace = self.scene.hit(ray);
        if !trace.hit {
            return self
                .scene
                .environment()
                .map_or(Spectrum::ZERO, |env| env.sample_direction(ray.dir));
        }

        let bsdf = self.scene.material(trace.material);

        let mut normal = trace.normal;
        if !bsdf.is_sided() && normal.dot(ray.dir) > 0.0 {
            normal = -normal;
        }

        let frame = Frame::rotate_to(normal);
        let out_dir = frame.to_local(-ray.dir);

        let direct = if bsdf.is_discrete() {
            Spectrum::ZERO
        } else {
            self.direct_lighting(bsdf, &frame, trace.position, out_dir, rng)
        };

        if ray.depth >= self.config.max_depth {
            return direct;
        }

        let sample = bsdf.sample(out_dir, rng);
        let cos_theta = sample.direction.y.abs();
        let throughput = ray.throughput * sample.attenuation * cos_theta / sample.pdf;

        let survival = luma(throughput).clamp(0.0, 1.0);
        if gen_f32(rng) < 1.0 - survival {
            return direct + sample.emissive;
        }

        let next = Ray::spawn(
            trace.position,
            frame.to_world(sample.direction),
            ray.dist_bounds.max,
        )
        .with_depth(ray.depth + 1)
        .with_throughput(throughput / survival);

        let incoming = self.trace_ray(&next, rng);
        direct + sample.emissive + (cos_theta / (sample.pdf * survival)) * incoming * sample.attenuation
    }

    /// Shadow-ray estimate of the light arriving directly from every light
    /// and the environment.
    fn direct_lighting(
        &self,
        bsdf: &dyn Bsdf,
        frame: &Frame,
        position: Vec3,
        out_dir: Vec3,
        rng: &mut dyn RngCore,
    ) -> Spectrum {
        let mut direct = Spectrum::ZERO;
        for light in self.scene.lights() {
            direct += self.sample_light(light.as_ref(), bsdf, frame, position, out_dir, rng);
        }
        if let Some(env) = self.scene.environment() {
            direct += self.sample_light(env, bsdf, frame, position, out_dir, rng);
        }
        direct
    }

    fn sample_light(
        &self,
        light: &dyn Light,
        bsdf: &dyn Bsdf,
        frame: &Frame,
        position: Vec3,
        out_dir: Vec3,
        rng: &mut dyn RngCore,
    ) -> Spectrum {
        let count = if light.is_discrete() {
            1
        } else {
            self.config.area_samples
        };

        let mut total = Spectrum::ZERO;
        for _ in 0..count {
            let sample = light.sample(position, rng);
            let in_dir = frame.to_local(sample.direction);

            let cos_theta = in_dir.y;
            if cos_theta <= 0.0 {
                continue;
            }

            let attenuation = bsdf.evaluate(out_dir, in_dir);
            if luma(attenuation) <= 0.0 {
                continue;
            }

            let shadow = Ray::spawn(position, sample.direction, sample.distance);
            if self.scene.hit(&shadow).hit {
                continue;
            }

            total += (cos_theta / (count as f32 * sample.pdf)) * sample.radiance * attenuation;
        }

        total
    }
}
