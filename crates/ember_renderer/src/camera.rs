//! Camera: viewport geometry and ray generation.

use crate::{sampling, Ray};
use ember_math::{near_zero, Point3, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Errors from degenerate camera configuration.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("look_from and look_at coincide; the view direction is undefined")]
    DegenerateView,

    #[error("vup is parallel to the view direction; the camera frame is undefined")]
    DegenerateUp,
}

/// Camera for generating rays into the scene.
///
/// Configuration fields are public; `initialize` derives the viewport
/// geometry from them and must run before the first `get_ray`. The derived
/// state is a pure function of the configuration, so re-initializing with
/// unchanged settings reproduces it exactly, and a render loop may read the
/// camera from many threads.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f64,          // Vertical field of view in degrees
    pub defocus_angle: f64, // Variation angle of rays through each pixel, degrees
    pub focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Cached values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Point3::new(0.0, 0.0, -1.0),
            look_at: Point3::new(0.0, 0.0, 0.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            // Cached values (initialized to defaults)
            image_height: 0,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set the aspect ratio and image width; the height is derived.
    pub fn with_image(mut self, aspect_ratio: f64, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Derive the viewport geometry from the configuration.
    ///
    /// Must be called before generating rays. Image dimensions are clamped
    /// to a minimum of one pixel; a degenerate view frame is rejected.
    pub fn initialize(&mut self) -> Result<(), CameraError> {
        self.image_width = self.image_width.max(1);
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);

        self.center = self.look_from;

        let direction = self.look_from - self.look_at;
        if near_zero(direction) {
            return Err(CameraError::DegenerateView);
        }

        // Viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Camera basis vectors
        self.w = direction.normalize();
        let up_cross = self.vup.cross(self.w);
        if near_zero(up_cross) {
            return Err(CameraError::DegenerateUp);
        }
        self.u = up_cross.normalize();
        self.v = self.w.cross(self.u);

        // Viewport edge vectors: u spans the horizontal edge, -v the vertical
        // edge so pixel rows run top to bottom
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        Ok(())
    }

    /// Rendered image height in pixels; valid after `initialize`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Generate a ray for pixel (i, j), jittered inside the pixel for
    /// anti-aliasing and originating on the defocus disk when the lens has
    /// a nonzero aperture.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + (i as f64 + offset.x) * self.pixel_delta_u
            + (j as f64 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;

        Ray::new(ray_origin, ray_direction)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = sampling::random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(
        sampling::gen_f64(rng) - 0.5,
        sampling::gen_f64(rng) - 0.5,
        0.0,
    )
}
