//! Light sources sampled for direct lighting.

use lumen_math::{Spectrum, Vec2, Vec3};
use rand::RngCore;

use crate::sampler::{Point, RectUniform, Sampler};

/// A sampled connection from a shading point to a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the shading point toward the light
    pub direction: Vec3,
    /// Distance to the sampled point on the light (infinite for distant lights)
    pub distance: f32,
    /// Radiance arriving along `direction`
    pub radiance: Spectrum,
    /// Solid-angle density of `direction`, or the pmf for discrete lights
    pub pdf: f32,
}

/// Trait for lights that can be sampled from a point in the scene.
pub trait Light: Send + Sync {
    /// Sample the light as seen from `from`.
    fn sample(&self, from: Vec3, rng: &mut dyn RngCore) -> LightSample;

    /// True if every sample is identical (point-like lights), so one sample
    /// per shading point is enough.
    fn is_discrete(&self) -> bool;
}

/// Isotropic point light with inverse-square falloff.
#[derive(Debug, Clone)]
pub struct PointLight {
    position: Point,
    intensity: Spectrum,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Spectrum) -> Self {
        Self {
            position: Point::new(position),
            intensity,
        }
    }
}

impl Light for PointLight {
    fn sample(&self, from: Vec3, rng: &mut dyn RngCore) -> LightSample {
        let (position, pmf) = self.position.sample(rng);
        let offset = position - from;
        let distance = offset.length();

        LightSample {
            direction: offset / distance,
            distance,
            radiance: self.intensity / (distance * distance),
            pdf: pmf,
        }
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// Light arriving from a single direction at infinity (e.g. the sun).
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Unit direction pointing toward the light
    direction: Vec3,
    radiance: Spectrum,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, radiance: Spectrum) -> Self {
        Self {
            direction: direction.normalize(),
            radiance,
        }
    }
}

impl Light for DirectionalLight {
    fn sample(&self, _from: Vec3, _rng: &mut dyn RngCore) -> LightSample {
        LightSample {
            direction: self.direction,
            distance: f32::INFINITY,
            radiance: self.radiance,
            pdf: 1.0,
        }
    }

    fn is_discrete(&self) -> bool {
        true
    }
}

/// One-sided rectangular area light.
///
/// Spans `corner + s * edge_u + t * edge_v` for `s, t` in `[0, 1)` and emits
/// toward `edge_u x edge_v`.
#[derive(Debug, Clone)]
pub struct RectangleLight {
    corner: Vec3,
    axis_u: Vec3,
    axis_v: Vec3,
    normal: Vec3,
    footprint: RectUniform,
    radiance: Spectrum,
}

impl RectangleLight {
    /// `edge_u` and `edge_v` must be perpendicular.
    pub fn new(corner: Vec3, edge_u: Vec3, edge_v: Vec3, radiance: Spectrum) -> Self {
        Self {
            corner,
            axis_u: edge_u.normalize(),
            axis_v: edge_v.normalize(),
            normal: edge_u.cross(edge_v).normalize(),
            footprint: RectUniform::new(Vec2::new(edge_u.length(), edge_v.length())),
            radiance,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Light for RectangleLight {
    fn sample(&self, from: Vec3, rng: &mut dyn RngCore) -> LightSample {
        let (uv, area_pdf) = self.footprint.sample(rng);
        let point = self.corner + uv.x * self.axis_u + uv.y * self.axis_v;

        let offset = point - from;
        let distance = offset.length();
        let direction = offset / distance;

        let cos_light = -direction.dot(self.normal);
        if cos_light <= 0.0 {
            // Back side: no light arrives, keep the density finite.
            return LightSample {
                direction,
                distance,
                radiance: Spectrum::ZERO,
                pdf: 1.0,
            };
        }

        // Convert the area density to solid angle at `from`.
        LightSample {
            direction,
            distance,
            radiance: self.radiance,
            pdf: area_pdf * distance * distance / cos_light,
        }
    }

    fn is_discrete(&self) -> bool {
        false
    }
}
