use crate::Vec3;

/// Linear RGB radiance/attenuation triple.
pub type Spectrum = Vec3;

/// Rec. 709 luminance of a spectrum.
#[inline]
pub fn luma(s: Spectrum) -> f32 {
    0.2126 * s.x + 0.7152 * s.y + 0.0722 * s.z
}
