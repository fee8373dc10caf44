//! Read-only scene data shared by all render workers.

use lumen_math::{Ray, Vec3};

use crate::environment::EnvironmentLight;
use crate::hittable::{Hittable, MaterialId, Object, Trace};
use crate::light::Light;
use crate::material::Bsdf;
use crate::sphere::Sphere;

/// Geometry, materials and lights.
///
/// Intersection is a linear scan over the objects. Everything is immutable
/// once rendering starts, so the scene can be shared across threads without
/// locking.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Object>,
    materials: Vec<Box<dyn Bsdf>>,
    lights: Vec<Box<dyn Light>>,
    environment: Option<EnvironmentLight>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material and return its id.
    pub fn add_material(&mut self, material: impl Bsdf + 'static) -> MaterialId {
        self.materials.push(Box::new(material));
        self.materials.len() - 1
    }

    /// Add an object.
    ///
    /// # Panics
    ///
    /// If the object's material id was not returned by [`Scene::add_material`].
    pub fn add_object(&mut self, object: Object) {
        assert!(
            object.material() < self.materials.len(),
            "unknown material id {}",
            object.material()
        );
        self.objects.push(object);
    }

    /// Convenience for adding a sphere of `radius` centered at `center`.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) {
        self.add_object(Object::new(Sphere::new(radius), center, material));
    }

    pub fn add_light(&mut self, light: impl Light + 'static) {
        self.lights.push(Box::new(light));
    }

    /// Set (or replace) the environment light.
    pub fn set_environment(&mut self, environment: EnvironmentLight) {
        self.environment = Some(environment);
    }

    pub fn material(&self, id: MaterialId) -> &dyn Bsdf {
        self.materials[id].as_ref()
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn environment(&self) -> Option<&EnvironmentLight> {
        self.environment.as_ref()
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no geometry.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray) -> Trace {
        let mut closest = Trace::miss();
        let mut query = *ray;

        for object in &self.objects {
            let trace = object.hit(&query);
            if trace.hit {
                query.dist_bounds = query.dist_bounds.clip_max(trace.distance);
                closest = trace;
            }
        }

        closest
    }
}
