//! Core path tracing render loop.

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, Hittable, Ray};
use ember_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lower bound for accepted hit distances, suppressing self-intersection
/// ("shadow acne") at ray origins.
const T_MIN: f64 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the recursive path tracing step: find the closest hit, scatter
/// off its material and attenuate the color carried back by the scattered
/// ray. A ray that exhausts the bounce limit or is absorbed contributes
/// black; a ray that escapes the scene samples the sky gradient.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    match world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) {
        Some(rec) => match rec.material.scatter(ray, &rec, rng) {
            Some(scatter) => {
                scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        },
        None => sky_gradient(ray),
    }
}

/// Vertical white-to-blue background gradient on the ray direction.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel: the average of `samples_per_pixel` jittered rays.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, rng);
    }

    pixel_color / camera.samples_per_pixel as f64
}

/// Output transfer function applied when quantizing to 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    /// Emit the linear sample average unchanged.
    #[default]
    Linear,
    /// Gamma 2.0: square root of the linear channel.
    Gamma2,
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Channel range admitted by the quantizer.
const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Convert a color to 8-bit RGB channels.
pub fn color_to_rgb8(color: Color, tone: ToneMapping) -> [u8; 3] {
    let quantize = |channel: f64| -> u8 {
        let mapped = match tone {
            ToneMapping::Linear => channel,
            ToneMapping::Gamma2 => linear_to_gamma(channel),
        };
        (255.999 * INTENSITY.clamp(mapped)) as u8
    };

    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render target storing linear-light colors, position-indexed.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

/// Render the scene single-threaded, scanline by scanline.
///
/// One RNG stream drives every sample in a fixed order, so a seeded `rng`
/// makes the whole image reproducible. The camera must be initialized.
pub fn render(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height());

    for y in 0..image.height {
        log::info!("Scanlines remaining: {}", image.height - y);
        for x in 0..image.width {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color);
        }
    }
    log::info!("Done.");

    image
}

/// Render the scene in parallel over tiles.
///
/// Every tile owns a `StdRng` seeded from `seed` and the tile index, and
/// tile results land at their image positions, so the output is identical
/// for a given seed regardless of thread count or completion order.
/// Progress logging is best-effort and unordered. The camera must be
/// initialized.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    let remaining = AtomicUsize::new(buckets.len());

    let results: Vec<_> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(bucket.index as u64));
            let pixels = render_bucket(bucket, camera, world, &mut rng);
            let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            log::debug!("Buckets remaining: {}", left);
            (*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for (bucket, pixels) in results {
        let mut i = 0;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                image.set(bucket.x + local_x, bucket.y + local_y, pixels[i]);
                i += 1;
            }
        }
    }
    log::info!("Done.");

    image
}
