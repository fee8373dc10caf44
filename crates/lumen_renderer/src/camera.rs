//! Camera for ray generation.

use lumen_math::{Ray, Vec2, Vec3};

/// Maps normalized image coordinates to primary rays.
pub trait Camera: Send + Sync {
    /// Ray through the image point `uv` in `[0, 1]^2`, `(0, 0)` being the
    /// top-left corner. Returned rays have depth 0 and unit throughput.
    fn generate_ray(&self, uv: Vec2) -> Ray;
}

/// Pinhole perspective camera.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32, // Vertical field of view in degrees
    aspect_ratio: f32,

    // Cached computed values (set by initialize())
    upper_left: Vec3,
    viewport_u: Vec3,
    viewport_v: Vec3,
}

impl PinholeCamera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            upper_left: Vec3::ZERO,
            viewport_u: Vec3::ZERO,
            viewport_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialize();
        self
    }

    /// Set vertical field of view (degrees).
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.initialize();
        self
    }

    /// Set the width / height ratio of the image plane.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.initialize();
        self
    }

    /// Match the aspect ratio to an image resolution.
    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        self.with_aspect_ratio(width as f32 / height as f32)
    }

    /// Recompute the image plane from the current settings.
    fn initialize(&mut self) {
        // Calculate viewport dimensions on a plane one unit in front of the eye
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * self.aspect_ratio;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        // u runs right, v runs down the image
        self.viewport_u = viewport_width * u;
        self.viewport_v = -viewport_height * v;
        self.upper_left = self.look_from - w - self.viewport_u / 2.0 - self.viewport_v / 2.0;
    }
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, uv: Vec2) -> Ray {
        let target = self.upper_left + uv.x * self.viewport_u + uv.y * self.viewport_v;
        Ray::new(self.look_from, target - self.look_from)
    }
}
