//! Material trait and surface scattering models.

use crate::{hittable::HitRecord, sampling, Ray};
use ember_math::{near_zero, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A scattered ray and the attenuation it carries.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the scattered ray and its attenuation, or None if the ray
    /// is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let mut direction = rec.normal + sampling::random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(direction) {
            direction = rec.normal;
        }

        Some(Scatter {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: the color of the metal
    /// - `fuzz`: roughness, 0.0 = perfect mirror, 1.0 = very rough; clamped to [0, 1]
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * sampling::random_unit_vector(rng);

        // Absorb rays that the fuzz perturbation pushed below the surface
        if direction.dot(rec.normal) > 0.0 {
            Some(Scatter {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material with the given index of refraction.
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection leaves no refracted ray to choose
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > sampling::gen_f64(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(Scatter {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // StepRng yielding this constant makes every uniform f64 draw 0.75, so
    // random_unit_vector always returns the unit (1,1,1)/sqrt(3) direction.
    const THREE_QUARTERS: u64 = 0xC000_0000_0000_0000;

    fn record_at<'a>(
        p: Vec3,
        normal: Vec3,
        front_face: bool,
        material: &'a dyn Material,
    ) -> HitRecord<'a> {
        HitRecord {
            p,
            normal,
            t: 1.0,
            front_face,
            material,
        }
    }

    #[test]
    fn test_lambertian_always_scatters_off_the_normal() {
        let albedo = Color::new(0.8, 0.2, 0.1);
        let material = Lambertian::new(albedo);
        let rec = record_at(Vec3::ZERO, Vec3::Y, true, &material);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let scatter = material
                .scatter(&ray_in, &rec, &mut rng)
                .expect("lambertian never absorbs");
            assert_eq!(scatter.attenuation, albedo);
            assert!(!near_zero(scatter.scattered.direction()));
            assert_eq!(scatter.scattered.origin(), rec.p);
        }
    }

    #[test]
    fn test_metal_zero_fuzz_is_mirror_reflection() {
        let material = Metal::new(Color::new(0.9, 0.9, 0.9), 0.0);
        let normal = Vec3::Y;
        let rec = record_at(Vec3::ZERO, normal, true, &material);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let mut rng = StdRng::seed_from_u64(1);
        let scatter = material
            .scatter(&ray_in, &rec, &mut rng)
            .expect("reflection leaves the surface");

        let expected = reflect(ray_in.direction().normalize(), normal);
        assert!((scatter.scattered.direction() - expected).length() < 1e-15);
        // Ideal mirror about (0,1,0): incoming (1,-1,0)/sqrt(2) -> (1,1,0)/sqrt(2)
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((scatter.scattered.direction() - Vec3::new(s, s, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_metal_absorbs_when_fuzz_dips_below_surface() {
        let material = Metal::new(Color::new(0.9, 0.9, 0.9), 1.0);
        // Ceiling surface: normal points down, so the fixed fuzz offset
        // (all-positive components) drags the grazing reflection behind it.
        let normal = Vec3::new(0.0, -1.0, 0.0);
        let rec = record_at(Vec3::ZERO, normal, true, &material);
        let ray_in = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 1.0e-6, 0.0));

        let mut rng = StepRng::new(THREE_QUARTERS, 0);
        assert!(material.scatter(&ray_in, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_dielectric_always_scatters_with_unit_attenuation() {
        let material = Dielectric::new(1.5);
        let rec = record_at(Vec3::ZERO, Vec3::Y, true, &material);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.2));

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let scatter = material
                .scatter(&ray_in, &rec, &mut rng)
                .expect("dielectric never absorbs");
            assert_eq!(scatter.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Back-face hit: the ray travels inside the glass at 45 degrees,
        // past the ~41.8 degree critical angle, so it must reflect.
        let normal = Vec3::Y;
        let rec = record_at(Vec3::ZERO, normal, false, &material);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let mut rng = StdRng::seed_from_u64(3);
        let scatter = material
            .scatter(&ray_in, &rec, &mut rng)
            .expect("reflection always scatters");

        let expected = reflect(ray_in.direction().normalize(), normal);
        assert!((scatter.scattered.direction() - expected).length() < 1e-15);
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let refracted = refract(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 0.5);
        assert!((refracted - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-12);
    }
}
