// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod frame;
mod interval;
mod ray;
mod spectrum;

pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;
pub use spectrum::{luma, Spectrum};

/// Offset used to keep secondary rays from re-hitting the surface they leave.
pub const RAY_EPSILON: f32 = 1e-4;
