use crate::Vec3;

/// Orthonormal shading basis whose `+Y` axis is a surface normal.
///
/// In local space `cos(theta)` against the normal is just the `y` coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            x: Vec3::X,
            y: Vec3::Y,
            z: Vec3::Z,
        }
    }
}

impl Frame {
    /// Build a frame that rotates local `+Y` onto `normal` (which must be unit length).
    pub fn rotate_to(normal: Vec3) -> Self {
        let (x, z) = normal.any_orthonormal_pair();
        // Keep the basis right handed: x cross y == z.
        if x.cross(normal).dot(z) > 0.0 {
            Self { x, y: normal, z }
        } else {
            Self { x, y: normal, z: -z }
        }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.x), v.dot(self.y), v.dot(self.z))
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}
