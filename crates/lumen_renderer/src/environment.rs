//! Environment lighting: light arriving from infinitely far away.
//!
//! An environment light answers two questions: what radiance does a ray that
//! escapes the scene see (`sample_direction`), and, as a [`Light`], which
//! directions should shadow rays be sent in.

use std::path::Path;

use lumen_core::{HdrImage, ImageResult};
use lumen_math::{Spectrum, Vec3};
use rand::RngCore;

use crate::light::{Light, LightSample};
use crate::sampler::{HemisphereUniform, Sampler, SphereImage, SphereUniform};

/// An image-based environment with importance sampling.
#[derive(Debug, Clone)]
pub struct EnvMap {
    image: HdrImage,
    sampler: SphereImage,
    scale: f32,
}

impl EnvMap {
    /// Build the sampling tables for `image`. Radiance is multiplied by `scale`.
    pub fn new(image: HdrImage, scale: f32) -> Self {
        let sampler = SphereImage::new(&image);
        log::debug!(
            "Environment map {}x{}, total energy {:.3}",
            image.width,
            image.height,
            sampler.total_energy()
        );
        Self {
            image,
            sampler,
            scale,
        }
    }

    /// Load an environment image from disk.
    pub fn load(path: impl AsRef<Path>, scale: f32) -> ImageResult<Self> {
        Ok(Self::new(HdrImage::load(path)?, scale))
    }

    pub fn radiance(&self, dir: Vec3) -> Spectrum {
        let (x, y) = self.sampler.texel_of(dir);
        self.image.at(x, y) * self.scale
    }

    /// Density with which shadow-ray directions are drawn.
    pub fn pdf(&self, dir: Vec3) -> f32 {
        self.sampler.pdf(dir)
    }
}

/// The scene's single optional environment light.
#[derive(Debug, Clone)]
pub enum EnvironmentLight {
    /// Constant radiance from the upper (`+Y`) hemisphere, black below.
    Hemisphere { radiance: Spectrum },
    /// Constant radiance from every direction.
    Sphere { radiance: Spectrum },
    /// Radiance looked up in an image.
    Map(EnvMap),
}

impl EnvironmentLight {
    /// Radiance arriving along `-dir`, i.e. seen by a ray travelling along `dir`.
    pub fn sample_direction(&self, dir: Vec3) -> Spectrum {
        match self {
            EnvironmentLight::Hemisphere { radiance } => {
                if dir.y > 0.0 {
                    *radiance
                } else {
                    Spectrum::ZERO
                }
            }
            EnvironmentLight::Sphere { radiance } => *radiance,
            EnvironmentLight::Map(map) => map.radiance(dir),
        }
    }
}

impl Light for EnvironmentLight {
    fn sample(&self, _from: Vec3, rng: &mut dyn RngCore) -> LightSample {
        let (direction, pdf) = match self {
            EnvironmentLight::Hemisphere { .. } => HemisphereUniform.sample(rng),
            EnvironmentLight::Sphere { .. } => SphereUniform.sample(rng),
            EnvironmentLight::Map(map) => map.sampler.sample(rng),
        };

        LightSample {
            direction,
            distance: f32::INFINITY,
            radiance: self.sample_direction(direction),
            pdf,
        }
    }

    fn is_discrete(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    #[test]
    fn test_hemisphere_is_dark_below() {
        let env = EnvironmentLight::Hemisphere {
            radiance: Spectrum::ONE,
        };
        assert_eq!(env.sample_direction(Vec3::Y), Spectrum::ONE);
        assert_eq!(env.sample_direction(-Vec3::Y), Spectrum::ZERO);
    }

    #[test]
    fn test_hemisphere_samples_stay_up() {
        let env = EnvironmentLight::Hemisphere {
            radiance: Spectrum::splat(2.0),
        };
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..100 {
            let s = env.sample(Vec3::ZERO, &mut rng);
            assert!(s.direction.y >= 0.0);
            assert_eq!(s.pdf, 1.0 / (2.0 * PI));
            assert_eq!(s.distance, f32::INFINITY);
        }
        assert!(!env.is_discrete());
    }

    #[test]
    fn test_sphere_environment() {
        let env = EnvironmentLight::Sphere {
            radiance: Spectrum::new(0.1, 0.2, 0.3),
        };
        let mut rng = StdRng::seed_from_u64(32);

        let s = env.sample(Vec3::new(1.0, 2.0, 3.0), &mut rng);
        assert_eq!(s.radiance, Spectrum::new(0.1, 0.2, 0.3));
        assert_eq!(s.pdf, 1.0 / (4.0 * PI));
        assert_eq!(env.sample_direction(-Vec3::Z), Spectrum::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_env_map_lookup_and_sampling() {
        // Top row bright, bottom row dim
        let mut pixels = vec![Spectrum::splat(4.0); 4];
        pixels.extend(vec![Spectrum::splat(0.5); 4]);
        let image = HdrImage::new(4, 2, pixels).unwrap();
        let env = EnvironmentLight::Map(EnvMap::new(image, 2.0));

        assert_eq!(env.sample_direction(Vec3::Y), Spectrum::splat(8.0));
        assert_eq!(env.sample_direction(-Vec3::Y), Spectrum::splat(1.0));

        let mut rng = StdRng::seed_from_u64(33);
        let n = 4000;
        let mut up = 0;
        for _ in 0..n {
            let s = env.sample(Vec3::ZERO, &mut rng);
            assert!(s.pdf > 0.0);
            if s.direction.y > 0.0 {
                up += 1;
            }
        }

        // The upper hemisphere holds 8/9 of the energy
        let fraction = up as f32 / n as f32;
        assert!((fraction - 8.0 / 9.0).abs() < 0.03, "fraction = {fraction}");
    }

    #[test]
    fn test_env_map_load_missing_file() {
        assert!(EnvMap::load("/nonexistent/lumen/sky.exr", 1.0).is_err());
    }
}
