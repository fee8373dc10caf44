//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use lumen_math::Spectrum;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::integrator::PathTracer;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator. Depends only on the base seed and
    /// the bucket's place in the render order, not on which thread runs it.
    fn seed(&self, base: u64) -> u64 {
        base ^ (self.index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward, so the middle of the frame
/// is finished first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center. The sort is stable, so ties
/// keep their row-major order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center_x;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, tracer: &PathTracer) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(tracer.config().seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(tracer.trace_pixel(global_x, global_y, &mut rng));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel radiance in row-major order
    pub pixels: Vec<Spectrum>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Spectrum>) -> Self {
        Self { bucket, pixels }
    }
}
