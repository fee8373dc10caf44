//! Hittable trait and the `Trace` intersection record.

use lumen_math::{Ray, Vec3};

/// Index of a material in the scene's material table.
pub type MaterialId = usize;

/// Record of a ray-surface intersection.
///
/// Produced by intersection queries and consumed immediately; a miss is a
/// normal outcome encoded by `hit == false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    /// Whether anything was hit
    pub hit: bool,
    /// Origin of the query ray
    pub origin: Vec3,
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal at the intersection (outward facing)
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub distance: f32,
    /// Material at the intersection point
    pub material: MaterialId,
}

impl Trace {
    /// A record reporting no intersection.
    pub fn miss() -> Self {
        Self {
            hit: false,
            origin: Vec3::ZERO,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            distance: f32::INFINITY,
            material: 0,
        }
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::miss()
    }
}

/// Trait for geometry that can be intersected by rays.
///
/// Queries are read-only, so shared geometry can be hit from many threads.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` inside `ray.dist_bounds`.
    fn hit(&self, ray: &Ray) -> Trace;
}

/// A shape placed in the world at `center` with a material.
///
/// Placement is a pure translation, so distances along the ray are the same in
/// the shape's local frame and in world space.
pub struct Object {
    shape: Box<dyn Hittable>,
    center: Vec3,
    material: MaterialId,
}

impl Object {
    pub fn new(shape: impl Hittable + 'static, center: Vec3, material: MaterialId) -> Self {
        Self {
            shape: Box::new(shape),
            center,
            material,
        }
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Object {
    fn hit(&self, ray: &Ray) -> Trace {
        let mut local = *ray;
        local.origin -= self.center;

        let mut trace = self.shape.hit(&local);
        if trace.hit {
            trace.origin = ray.origin;
            trace.position += self.center;
            trace.material = self.material;
        }
        trace
    }
}
