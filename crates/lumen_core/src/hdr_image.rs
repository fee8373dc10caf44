//! Linear RGB images used as environment maps.
//!
//! Floating point formats (Radiance `.hdr`, OpenEXR) are taken as linear.
//! 8/16-bit formats are treated as sRGB encoded and linearized on load.

use std::path::Path;

use image::DynamicImage;
use lumen_math::{luma, Spectrum};
use thiserror::Error;

/// Errors that can occur while building or loading an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image: {0}")]
    LoadError(String),

    #[error("Pixel count {got} does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, got: usize },

    #[error("Image has no pixels")]
    Empty,
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A linear RGB image, row-major with row 0 at the top.
#[derive(Clone, Debug)]
pub struct HdrImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    pixels: Vec<Spectrum>,
}

impl HdrImage {
    /// Create an image from row-major pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Spectrum>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a 1x1 image of a single color.
    pub fn solid_color(color: Spectrum) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Load an image from disk.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            ImageError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let image = Self::from_dynamic(img)?;
        log::debug!(
            "Loaded environment image: {} ({}x{}, {:.1} KB)",
            path.display(),
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );
        Ok(image)
    }

    /// Convert a decoded image to linear RGB.
    pub fn from_dynamic(img: DynamicImage) -> ImageResult<Self> {
        let (width, height) = (img.width(), img.height());
        let pixels = match img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => img
                .to_rgb32f()
                .pixels()
                .map(|p| Spectrum::new(p[0], p[1], p[2]))
                .collect(),
            _ => img
                .to_rgb8()
                .pixels()
                .map(|p| {
                    Spectrum::new(
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                    )
                })
                .collect(),
        };
        Self::new(width, height, pixels)
    }

    /// Get the pixel at integer coordinates; out-of-range coordinates clamp to the edge.
    pub fn at(&self, x: u32, y: u32) -> Spectrum {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Luminance of the pixel at integer coordinates.
    pub fn luma_at(&self, x: u32, y: u32) -> f32 {
        luma(self.at(x, y))
    }

    pub fn dimension(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Spectrum>()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
