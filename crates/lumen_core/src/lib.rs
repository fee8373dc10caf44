//! Lumen Core - configuration and image inputs for the Lumen path tracer.
//!
//! This crate provides:
//!
//! - **Render configuration**: `RenderConfig`, loadable from JSON
//! - **Environment images**: `HdrImage`, linear RGB pixels decoded with `image`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{HdrImage, RenderConfig};
//!
//! let config = RenderConfig::from_file("render.json")?;
//! let sky = HdrImage::load("sky.hdr")?;
//! println!("{}x{} @ {} spp, sky {}x{}",
//!     config.width, config.height, config.samples_per_pixel,
//!     sky.width, sky.height);
//! ```

pub mod config;
pub mod hdr_image;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderConfig};
pub use hdr_image::{HdrImage, ImageError, ImageResult};
