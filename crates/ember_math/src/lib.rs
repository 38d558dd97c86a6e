//! Math foundation for the ember renderer.
//!
//! The render path works in double precision end to end, so this crate
//! re-exports glam's f64 vector type under the names the rest of the
//! workspace uses, alongside the `Interval` range type.

// Re-export glam for convenience
pub use glam::DVec3;

/// 3D vector. Points, directions and colors are all `Vec3`; callers
/// interpret by context.
pub type Vec3 = DVec3;

/// Alias used where a value is a position rather than a direction.
pub type Point3 = DVec3;

mod interval;
pub use interval::Interval;

/// Returns true if every component of `v` is below `1e-8` in absolute value.
///
/// Used to catch degenerate scatter directions before they are normalized.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const EPS: f64 = 1e-8;
    v.abs().max_element() < EPS
}
