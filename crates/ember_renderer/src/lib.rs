//! ember renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer over sphere primitives: jittered multi-sample
//! anti-aliasing, recursive material scattering (diffuse, metal, dielectric),
//! thin-lens defocus blur, tiled parallel rendering, and ASCII PPM output.

mod bucket;
mod camera;
mod hittable;
mod material;
mod ppm;
mod ray;
mod renderer;
pub mod sampling;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, Scatter};
pub use ppm::write_ppm;
pub use ray::Ray;
pub use renderer::{
    color_to_rgb8, ray_color, render, render_parallel, render_pixel, ImageBuffer, ToneMapping,
};
pub use sphere::Sphere;

/// Re-export the math types the public API speaks.
pub use ember_math::{Interval, Point3, Vec3};
