//! Sphere primitive for ray tracing.

use crate::hittable::{Hittable, Trace};
use lumen_math::Ray;

/// A sphere centered at the origin of its local frame.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Hit record for the root `t`.
    fn record(&self, ray: &Ray, t: f32) -> Trace {
        let position = ray.at(t);
        Trace {
            hit: true,
            origin: ray.origin,
            position,
            normal: position.normalize(),
            distance: t,
            material: 0,
        }
    }
}

/// Origins closer than this fraction of the radius to the surface are
/// treated as lying on it.
const SURFACE_BAND: f32 = 1e-5;

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray) -> Trace {
        // |o + t*d|^2 = r^2  =>  a*t^2 + b*t + c = 0
        let o = ray.origin;
        let d = ray.dir;
        let r = self.radius;
        let a = d.dot(d);
        let b = 2.0 * o.dot(d);

        // o.o - r^2 cancels badly far from the center; factor it instead.
        let o_len = o.length();
        let c = (o_len - r) * (o_len + r);

        let bounds = ray.dist_bounds;

        // A ray leaving the surface: its near root is the surface itself and
        // is lost in rounding for large spheres. Only the chord remains.
        if (o_len - r).abs() <= SURFACE_BAND * r {
            if b >= 0.0 {
                return Trace::miss();
            }
            let chord = -b / a;
            if !bounds.contains(chord) {
                return Trace::miss();
            }
            return self.record(ray, chord);
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return Trace::miss();
        }

        let t = if discriminant == 0.0 {
            let t0 = -b / (2.0 * a);
            if !bounds.contains(t0) {
                return Trace::miss();
            }
            t0
        } else {
            let sqrtd = discriminant.sqrt();
            let t_lo = (-b - sqrtd) / (2.0 * a);
            let t_hi = (-b + sqrtd) / (2.0 * a);

            // The near root wins; the far one only counts when the near one is
            // out of range (e.g. the ray starts inside the sphere).
            if bounds.contains(t_lo) {
                t_lo
            } else if bounds.contains(t_hi) {
                t_hi
            } else {
                return Trace::miss();
            }
        };

        self.record(ray, t)
    }
}
