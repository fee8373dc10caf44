//! Sampling primitives.
//!
//! Every sampler returns a value together with the probability density (or
//! mass, for the discrete ones) of having drawn it. Hemisphere samplers are
//! built around `+Y`, the pole of the shading frame.
//!
//! A sampler never reports a density of zero for a value it can produce, so
//! callers may divide by it.

use std::f32::consts::PI;

use lumen_core::HdrImage;
use lumen_math::{Vec2, Vec3};
use rand::RngCore;

use crate::gen_f32;

/// A distribution that can be drawn from.
pub trait Sampler {
    type Output;

    /// Draw a value and return it with its pdf/pmf.
    fn sample(&self, rng: &mut dyn RngCore) -> (Self::Output, f32);
}

/// Uniform points on the rectangle `[0, size.x) x [0, size.y)`.
#[derive(Debug, Clone, Copy)]
pub struct RectUniform {
    pub size: Vec2,
}

impl RectUniform {
    pub fn new(size: Vec2) -> Self {
        Self { size }
    }
}

impl Sampler for RectUniform {
    type Output = Vec2;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec2, f32) {
        let pdf = 1.0 / (self.size.x * self.size.y);
        let x = self.size.x * gen_f32(rng);
        let y = self.size.y * gen_f32(rng);
        (Vec2::new(x, y), pdf)
    }
}

/// Uniform directions over the `+Y` hemisphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct HemisphereUniform;

impl Sampler for HemisphereUniform {
    type Output = Vec3;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        let xi1 = gen_f32(rng);
        let xi2 = gen_f32(rng);

        let theta = xi1.acos();
        let phi = 2.0 * PI * xi2;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let dir = Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin());
        (dir, 1.0 / (2.0 * PI))
    }
}

/// Directions over the `+Y` hemisphere with density `cos(theta) / pi`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HemisphereCosine;

impl HemisphereCosine {
    /// Density of `dir`; zero below the horizon.
    pub fn pdf(dir: Vec3) -> f32 {
        dir.y.max(0.0) / PI
    }
}

impl Sampler for HemisphereCosine {
    type Output = Vec3;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        let xi1 = gen_f32(rng);
        let xi2 = gen_f32(rng);

        // Uniform disk point lifted onto the hemisphere (Malley's method).
        // xi1 < 1, so the height is strictly positive.
        let r = xi1.sqrt();
        let phi = 2.0 * PI * xi2;
        let y = (1.0 - xi1).sqrt();

        let dir = Vec3::new(r * phi.cos(), y, r * phi.sin());
        (dir, y / PI)
    }
}

/// Uniform directions over the whole sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereUniform;

impl SphereUniform {
    pub const PDF: f32 = 1.0 / (4.0 * PI);
}

impl Sampler for SphereUniform {
    type Output = Vec3;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        let y = 1.0 - 2.0 * gen_f32(rng);
        let r = (1.0 - y * y).max(0.0).sqrt();
        let phi = 2.0 * PI * gen_f32(rng);

        (Vec3::new(r * phi.cos(), y, r * phi.sin()), Self::PDF)
    }
}

/// Importance sampling of an environment image mapped onto the sphere.
///
/// Rows run from `+Y` (row 0) down to `-Y`; columns sweep the azimuth
/// `phi = atan2(z, x)` from 0 to 2pi. Each texel is chosen with probability
/// proportional to its luminance times its solid angle, then a direction is
/// drawn uniformly (in solid angle) inside it, so the density of a direction
/// is `pmf(texel) / solid_angle(texel)`.
#[derive(Debug, Clone)]
pub struct SphereImage {
    width: u32,
    height: u32,
    /// Per-texel energy, luminance * solid angle, row-major.
    energy: Vec<f32>,
    /// Solid angle of one texel in each row.
    texel_solid_angle: Vec<f32>,
    /// Marginal CDF over rows.
    row_cdf: Vec<f32>,
    /// Conditional CDF over columns, one run of `width` entries per row.
    col_cdf: Vec<f32>,
    total: f32,
}

impl SphereImage {
    /// Precompute the sampling tables for `image`.
    pub fn new(image: &HdrImage) -> Self {
        let (width, height) = image.dimension();
        let (w, h) = (width as usize, height as usize);

        let texel_solid_angle: Vec<f32> = (0..h)
            .map(|y| {
                let cos_top = (PI * y as f32 / h as f32).cos();
                let cos_bottom = (PI * (y + 1) as f32 / h as f32).cos();
                (2.0 * PI / w as f32) * (cos_top - cos_bottom)
            })
            .collect();

        let mut energy = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let lum = image.luma_at(x as u32, y as u32);
                let lum = if lum.is_finite() { lum.max(0.0) } else { 0.0 };
                energy.push(lum * texel_solid_angle[y]);
            }
        }

        let row_energy: Vec<f32> = energy.chunks(w).map(|row| row.iter().sum()).collect();
        let total: f32 = row_energy.iter().sum();

        let row_cdf = build_cdf(&row_energy);
        let col_cdf = energy.chunks(w).flat_map(build_cdf).collect();

        if total <= 0.0 {
            log::warn!("Environment image has no energy, falling back to uniform sphere sampling");
        }

        Self {
            width,
            height,
            energy,
            texel_solid_angle,
            row_cdf,
            col_cdf,
            total,
        }
    }

    /// Texel `(column, row)` containing direction `dir` (unit length).
    pub fn texel_of(&self, dir: Vec3) -> (u32, u32) {
        let theta = dir.y.clamp(-1.0, 1.0).acos();
        let mut phi = dir.z.atan2(dir.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }

        let x = ((phi / (2.0 * PI)) * self.width as f32) as u32;
        let y = ((theta / PI) * self.height as f32) as u32;
        (x.min(self.width - 1), y.min(self.height - 1))
    }

    /// Density with which `sample` produces `dir`.
    pub fn pdf(&self, dir: Vec3) -> f32 {
        if !self.has_energy() {
            return SphereUniform::PDF;
        }
        let (x, y) = self.texel_of(dir);
        self.texel_pdf(x as usize, y as usize)
    }

    /// Sum over texels of luminance times solid angle.
    pub fn total_energy(&self) -> f32 {
        self.total
    }

    fn has_energy(&self) -> bool {
        self.total > 0.0 && self.total.is_finite()
    }

    fn texel_pdf(&self, x: usize, y: usize) -> f32 {
        let pmf = self.energy[y * self.width as usize + x] / self.total;
        pmf / self.texel_solid_angle[y]
    }
}

impl Sampler for SphereImage {
    type Output = Vec3;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        if !self.has_energy() {
            return SphereUniform.sample(rng);
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let y = sample_cdf(&self.row_cdf, gen_f32(rng));
        let x = sample_cdf(&self.col_cdf[y * w..(y + 1) * w], gen_f32(rng));

        // Uniform in solid angle inside the texel: cos(theta) is linear in xi.
        let cos_top = (PI * y as f32 / h as f32).cos();
        let cos_bottom = (PI * (y + 1) as f32 / h as f32).cos();
        let cos_theta = cos_top + (cos_bottom - cos_top) * gen_f32(rng);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * (x as f32 + gen_f32(rng)) / w as f32;

        let dir = Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin());
        (dir, self.texel_pdf(x, y))
    }
}

/// Normalized running sum of `weights`.
///
/// Every entry from the last nonzero weight onwards is pinned to exactly 1, so
/// rounding can never leave a gap that selects a zero-weight bin. An all-zero
/// input yields an all-zero table.
fn build_cdf(weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }

    let mut running = 0.0;
    let mut cdf: Vec<f32> = weights
        .iter()
        .map(|w| {
            running += w;
            running / total
        })
        .collect();

    if let Some(last) = weights.iter().rposition(|&w| w > 0.0) {
        cdf[last..].iter_mut().for_each(|c| *c = 1.0);
    }
    cdf
}

/// Index of the first bin whose CDF exceeds `u` (an upper bound search).
fn sample_cdf(cdf: &[f32], u: f32) -> usize {
    cdf.partition_point(|&c| c <= u).min(cdf.len() - 1)
}

/// A fixed location, drawn with probability 1.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub point: Vec3,
}

impl Point {
    pub fn new(point: Vec3) -> Self {
        Self { point }
    }
}

impl Sampler for Point {
    type Output = Vec3;

    fn sample(&self, _rng: &mut dyn RngCore) -> (Vec3, f32) {
        (self.point, 1.0)
    }
}

/// Chooses `p1` with probability `prob`, otherwise `p2`.
#[derive(Debug, Clone, Copy)]
pub struct TwoPoints {
    pub p1: Vec3,
    pub p2: Vec3,
    pub prob: f32,
}

impl TwoPoints {
    pub fn new(p1: Vec3, p2: Vec3, prob: f32) -> Self {
        Self { p1, p2, prob }
    }
}

impl Sampler for TwoPoints {
    type Output = Vec3;

    fn sample(&self, rng: &mut dyn RngCore) -> (Vec3, f32) {
        if gen_f32(rng) < self.prob {
            (self.p1, self.prob)
        } else {
            (self.p2, 1.0 - self.prob)
        }
    }
}
