//! Lumen Renderer - CPU Path Tracing
//!
//! A recursive Monte Carlo path tracer. For every camera ray it gathers
//! direct light with shadow rays and indirect light by continuing the path
//! along BSDF-sampled directions, stopping paths with Russian roulette.

mod bucket;
mod camera;
mod environment;
mod hittable;
mod integrator;
mod light;
mod material;
mod renderer;
mod sampler;
mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use camera::{Camera, PinholeCamera};
pub use environment::{EnvMap, EnvironmentLight};
pub use hittable::{Hittable, MaterialId, Object, Trace};
pub use integrator::PathTracer;
pub use light::{DirectionalLight, Light, LightSample, PointLight, RectangleLight};
pub use material::{Bsdf, BsdfSample, DiffuseLight, Glass, Lambertian, Mirror};
pub use renderer::{color_to_rgba, render, ImageBuffer};
pub use sampler::{
    HemisphereCosine, HemisphereUniform, Point, RectUniform, Sampler, SphereImage, SphereUniform,
    TwoPoints,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export common math and config types
pub use lumen_core::{HdrImage, RenderConfig};
pub use lumen_math::{Frame, Interval, Ray, Spectrum, Vec2, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
