//! BSDF trait and the built-in materials.
//!
//! All directions are in the local shading frame, where the surface normal is
//! `+Y`, so `cos(theta)` of a direction is its `y` component.

use std::f32::consts::PI;

use lumen_math::{Spectrum, Vec3};
use rand::RngCore;

use crate::gen_f32;
use crate::sampler::{HemisphereCosine, HemisphereUniform, Sampler};

/// A direction drawn from a BSDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    /// Incoming light direction (local frame)
    pub direction: Vec3,
    /// BSDF value for the sampled pair of directions
    pub attenuation: Spectrum,
    /// Density of `direction`; for discrete materials the branch probability
    pub pdf: f32,
    /// Light emitted by the surface toward the outgoing direction
    pub emissive: Spectrum,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Bsdf: Send + Sync {
    /// BSDF value for light arriving along `in_dir` and leaving along `out_dir`.
    ///
    /// Discrete materials return zero: a delta lobe has no finite value.
    fn evaluate(&self, out_dir: Vec3, in_dir: Vec3) -> Spectrum;

    /// Draw an incoming direction for light leaving along `out_dir`.
    fn sample(&self, out_dir: Vec3, rng: &mut dyn RngCore) -> BsdfSample;

    /// True for delta-distribution materials (mirrors, glass) that scatter
    /// into exactly one direction per branch.
    fn is_discrete(&self) -> bool {
        false
    }

    /// True if the material behaves differently on its front and back faces.
    /// Unsided materials have their normal flipped toward the viewer.
    fn is_sided(&self) -> bool {
        false
    }
}

/// Lambertian (diffuse) material, optionally emissive.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Spectrum,
    emission: Spectrum,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Spectrum) -> Self {
        Self {
            albedo,
            emission: Spectrum::ZERO,
        }
    }

    /// Add light emitted uniformly from the surface.
    pub fn with_emission(mut self, emission: Spectrum) -> Self {
        self.emission = emission;
        self
    }
}

impl Bsdf for Lambertian {
    fn evaluate(&self, out_dir: Vec3, in_dir: Vec3) -> Spectrum {
        if out_dir.y <= 0.0 || in_dir.y <= 0.0 {
            return Spectrum::ZERO;
        }
        self.albedo / PI
    }

    fn sample(&self, out_dir: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        let (direction, pdf) = HemisphereCosine.sample(rng);
        BsdfSample {
            direction,
            attenuation: self.evaluate(out_dir, direction),
            pdf,
            emissive: self.emission,
        }
    }
}

/// Perfect mirror.
#[derive(Debug, Clone)]
pub struct Mirror {
    reflectance: Spectrum,
}

impl Mirror {
    pub fn new(reflectance: Spectrum) -> Self {
        Self { reflectance }
    }
}

impl Bsdf for Mirror {
    fn evaluate(&self, _out_dir: Vec3, _in_dir: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn sample(&self, out_dir: Vec3, _rng: &mut dyn RngCore) -> BsdfSample {
        let direction = reflect(out_dir);
        BsdfSample {
            direction,
            attenuation: delta_attenuation(self.reflectance, direction),
            pdf: 1.0,
            emissive: Spectrum::ZERO,
        }
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// Dielectric (glass) material.
///
/// Chooses between reflection and refraction with the Schlick Fresnel
/// probability, so each branch carries only its own tint.
#[derive(Debug, Clone)]
pub struct Glass {
    transmittance: Spectrum,
    reflectance: Spectrum,
    /// Index of refraction
    ior: f32,
}

impl Glass {
    /// Create a new Glass material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self {
            transmittance: Spectrum::ONE,
            reflectance: Spectrum::ONE,
            ior,
        }
    }

    /// Tint the transmitted and reflected light.
    pub fn with_tint(mut self, transmittance: Spectrum, reflectance: Spectrum) -> Self {
        self.transmittance = transmittance;
        self.reflectance = reflectance;
        self
    }

    /// Schlick's approximation for reflectance
    fn schlick(cos_i: f32, eta_i: f32, eta_t: f32) -> f32 {
        let r0 = ((eta_i - eta_t) / (eta_i + eta_t)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos_i).powi(5)
    }
}

impl Bsdf for Glass {
    fn evaluate(&self, _out_dir: Vec3, _in_dir: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn sample(&self, out_dir: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        // The normal points out of the glass; a negative y means we are inside.
        let entering = out_dir.y > 0.0;
        let (eta_i, eta_t) = if entering { (1.0, self.ior) } else { (self.ior, 1.0) };
        let eta = eta_i / eta_t;

        let cos_i = out_dir.y.abs();
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);

        let reflected = reflect(out_dir);
        if sin2_t >= 1.0 {
            // Total internal reflection
            return BsdfSample {
                direction: reflected,
                attenuation: delta_attenuation(self.reflectance, reflected),
                pdf: 1.0,
                emissive: Spectrum::ZERO,
            };
        }

        let fresnel = Self::schlick(cos_i, eta_i, eta_t);
        if gen_f32(rng) < fresnel {
            return BsdfSample {
                direction: reflected,
                attenuation: fresnel * delta_attenuation(self.reflectance, reflected),
                pdf: fresnel,
                emissive: Spectrum::ZERO,
            };
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let side = if entering { -1.0 } else { 1.0 };
        let refracted = Vec3::new(-eta * out_dir.x, side * cos_t, -eta * out_dir.z);
        BsdfSample {
            direction: refracted,
            attenuation: (1.0 - fresnel) * delta_attenuation(self.transmittance, refracted),
            pdf: 1.0 - fresnel,
            emissive: Spectrum::ZERO,
        }
    }

    fn is_discrete(&self) -> bool {
        true
    }

    fn is_sided(&self) -> bool {
        true
    }
}

/// Diffuse light emitter.
///
/// Emits `radiance` and reflects nothing, so paths end on it.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    radiance: Spectrum,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(radiance: Spectrum) -> Self {
        Self { radiance }
    }
}

impl Bsdf for DiffuseLight {
    fn evaluate(&self, _out_dir: Vec3, _in_dir: Vec3) -> Spectrum {
        Spectrum::ZERO
    }

    fn sample(&self, _out_dir: Vec3, rng: &mut dyn RngCore) -> BsdfSample {
        let (direction, pdf) = HemisphereUniform.sample(rng);
        BsdfSample {
            direction,
            attenuation: Spectrum::ZERO,
            pdf,
            emissive: self.radiance,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Mirror a local direction about the normal (`+Y`).
#[inline]
fn reflect(dir: Vec3) -> Vec3 {
    Vec3::new(-dir.x, dir.y, -dir.z)
}

/// Delta-lobe value whose cosine factor cancels the integrator's `cos(theta)`.
#[inline]
fn delta_attenuation(tint: Spectrum, dir: Vec3) -> Spectrum {
    let cos = dir.y.abs();
    if cos > 0.0 {
        tint / cos
    } else {
        Spectrum::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lambertian_evaluate() {
        let mat = Lambertian::new(Spectrum::splat(0.5));
        let up = Vec3::new(0.0, 1.0, 0.0);
        let grazing_below = Vec3::new(1.0, -0.1, 0.0).normalize();

        assert!((mat.evaluate(up, up) - Spectrum::splat(0.5 / PI)).length() < 1e-6);
        assert_eq!(mat.evaluate(up, grazing_below), Spectrum::ZERO);
        assert!(!mat.is_discrete());
        assert!(!mat.is_sided());
    }

    #[test]
    fn test_lambertian_sample_weight_is_albedo() {
        let mat = Lambertian::new(Spectrum::new(0.8, 0.4, 0.2)).with_emission(Spectrum::ONE);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let s = mat.sample(Vec3::Y, &mut rng);
            assert!(s.direction.y > 0.0);
            assert!(s.pdf > 0.0);
            // f * cos / pdf == albedo for cosine sampling
            let weight = s.attenuation * s.direction.y / s.pdf;
            assert!((weight - Spectrum::new(0.8, 0.4, 0.2)).length() < 1e-4);
            assert_eq!(s.emissive, Spectrum::ONE);
        }
    }

    #[test]
    fn test_mirror_reflects() {
        let mat = Mirror::new(Spectrum::splat(0.9));
        let mut rng = StdRng::seed_from_u64(12);
        let out = Vec3::new(0.6, 0.8, 0.0);

        let s = mat.sample(out, &mut rng);
        assert_eq!(s.direction, Vec3::new(-0.6, 0.8, 0.0));
        assert_eq!(s.pdf, 1.0);
        assert!((s.attenuation * s.direction.y - Spectrum::splat(0.9)).length() < 1e-5);
        assert!(mat.is_discrete());
        assert_eq!(mat.evaluate(out, s.direction), Spectrum::ZERO);
    }

    #[test]
    fn test_glass_normal_incidence_mostly_transmits() {
        let mat = Glass::new(1.5);
        let mut rng = StdRng::seed_from_u64(13);

        let mut transmitted = 0;
        for _ in 0..1000 {
            let s = mat.sample(Vec3::Y, &mut rng);
            assert!(s.pdf > 0.0);
            if s.direction.y < 0.0 {
                transmitted += 1;
                assert!((s.direction - (-Vec3::Y)).length() < 1e-5);
            }
            // Branch weight is the branch tint
            let weight = s.attenuation * s.direction.y.abs() / s.pdf;
            assert!((weight - Spectrum::ONE).length() < 1e-4);
        }

        // R0 = 0.04 at normal incidence
        assert!(transmitted > 900);
        assert!(mat.is_sided());
    }

    #[test]
    fn test_glass_total_internal_reflection() {
        let mat = Glass::new(1.5);
        let mut rng = StdRng::seed_from_u64(14);
        // Inside the glass, at a grazing angle beyond the critical angle
        let out = Vec3::new(0.9, -0.2, 0.0).normalize();

        for _ in 0..50 {
            let s = mat.sample(out, &mut rng);
            assert_eq!(s.pdf, 1.0);
            assert!(s.direction.y < 0.0);
        }
    }

    #[test]
    fn test_glass_refraction_obeys_snell() {
        let mat = Glass::new(1.5);
        let mut rng = StdRng::seed_from_u64(15);
        let out = Vec3::new(0.5, 0.75f32.sqrt(), 0.0);

        for _ in 0..200 {
            let s = mat.sample(out, &mut rng);
            if s.direction.y < 0.0 {
                let sin_i = out.x.abs();
                let sin_t = s.direction.x.abs();
                assert!((sin_i - 1.5 * sin_t).abs() < 1e-5);
                assert!((s.direction.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_diffuse_light_only_emits() {
        let mat = DiffuseLight::new(Spectrum::splat(4.0));
        let mut rng = StdRng::seed_from_u64(16);

        let s = mat.sample(Vec3::Y, &mut rng);
        assert_eq!(s.emissive, Spectrum::splat(4.0));
        assert_eq!(s.attenuation, Spectrum::ZERO);
        assert!(s.pdf > 0.0);
    }
}
