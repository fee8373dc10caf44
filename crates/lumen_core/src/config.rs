//! Render settings.
//!
//! Every field has a default, so a JSON document only needs to name the
//! settings it changes:
//!
//! ```json
//! { "width": 320, "height": 240, "samples_per_pixel": 16 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Camera rays per pixel; 1 means a single ray through the pixel center
    pub samples_per_pixel: u32,
    /// Shadow samples drawn per shading point for each area light
    pub area_samples: u32,
    /// Bounce depth at which paths stop gathering indirect light
    pub max_depth: u32,
    /// Base seed for the per-bucket random generators
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            samples_per_pixel: 16,
            area_samples: 8,
            max_depth: 8,
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded render config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Check that the settings describe a renderable image.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid("samples_per_pixel must be at least 1".into()));
        }
        if self.area_samples == 0 {
            return Err(ConfigError::Invalid("area_samples must be at least 1".into()));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set the number of shadow samples per area light.
    pub fn with_area_samples(mut self, area_samples: u32) -> Self {
        self.area_samples = area_samples;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the bucket edge length.
    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }
}
