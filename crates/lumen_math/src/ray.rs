use crate::{Interval, Spectrum, Vec3, RAY_EPSILON};

/// A ray in 3D space carrying its path state.
///
/// Besides the geometric line (`origin` + t * `dir`) a ray records the range of
/// `t` in which hits are accepted, how many bounces deep it is, and the
/// throughput accumulated by the path that spawned it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
    pub dist_bounds: Interval,
    pub depth: u32,
    pub throughput: Spectrum,
}

impl Ray {
    /// Create a camera-style ray: depth 0, unit throughput, `t` in `[0, inf]`.
    ///
    /// `dir` is normalized.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize(),
            dist_bounds: Interval::FORWARD,
            depth: 0,
            throughput: Spectrum::ONE,
        }
    }

    /// Create a ray leaving a surface point.
    ///
    /// The accepted range starts at [`RAY_EPSILON`] and ends `RAY_EPSILON`
    /// short of `max_dist`, so neither the surface the ray leaves nor a target
    /// sitting exactly at `max_dist` are reported as hits.
    pub fn spawn(origin: Vec3, dir: Vec3, max_dist: f32) -> Self {
        Self::new(origin, dir).with_bounds(Interval::new(0.0, max_dist).shrink(RAY_EPSILON))
    }

    /// Replace the accepted distance range.
    #[inline]
    pub fn with_bounds(mut self, dist_bounds: Interval) -> Self {
        self.dist_bounds = dist_bounds;
        self
    }

    /// Set the bounce depth.
    #[inline]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the path throughput.
    #[inline]
    pub fn with_throughput(mut self, throughput: Spectrum) -> Self {
        self.throughput = throughput;
        self
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * dir
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.dir, Vec3::Y);
        assert_eq!(ray.depth, 0);
        assert_eq!(ray.throughput, Spectrum::ONE);
        assert_eq!(ray.dist_bounds, Interval::FORWARD);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_spawn_excludes_both_ends() {
        let ray = Ray::spawn(Vec3::ZERO, Vec3::Z, 5.0);

        assert!(!ray.dist_bounds.contains(0.0));
        assert!(!ray.dist_bounds.contains(5.0));
        assert!(ray.dist_bounds.contains(2.5));
        assert_eq!(ray.dist_bounds.min, RAY_EPSILON);
    }

    #[test]
    fn test_spawn_towards_infinity() {
        let ray = Ray::spawn(Vec3::ZERO, Vec3::Z, f32::INFINITY);
        assert_eq!(ray.dist_bounds.max, f32::INFINITY);
    }

    #[test]
    fn test_builders_keep_geometry() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y)
            .with_depth(3)
            .with_throughput(Spectrum::splat(0.5));

        assert_eq!(ray.depth, 3);
        assert_eq!(ray.throughput, Spectrum::splat(0.5));
        assert_eq!(ray.dir, Vec3::Y);
    }
}
