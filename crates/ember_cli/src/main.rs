//! Renders the demo scene and writes an ASCII PPM image to stdout.
//!
//! Progress and timing go to stderr through env_logger, so the image can
//! be redirected: `ember > out.ppm`.

use anyhow::Result;
use ember_math::Vec3;
use ember_renderer::{
    render_parallel, sampling, write_ppm, Camera, Color, Dielectric, HittableList, Lambertian,
    Metal, Sphere, ToneMapping,
};
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

/// Base seed for the per-tile render generators.
const RENDER_SEED: u64 = 0x51ab;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let world = build_scene();
    log::info!("Scene ready: {} objects", world.len());

    let mut camera = Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_quality(50, 10)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize()?;

    log::info!(
        "Rendering {}x{} at {} samples per pixel",
        camera.image_width,
        camera.image_height(),
        camera.samples_per_pixel
    );

    let start = Instant::now();
    let image = render_parallel(&camera, &world, RENDER_SEED);
    log::info!("Rendered in {:.2?}", start.elapsed());

    let stdout = std::io::stdout();
    let mut sink = BufWriter::new(stdout.lock());
    write_ppm(&image, ToneMapping::Linear, &mut sink)?;

    Ok(())
}

/// The classic demo scene: a ground sphere, three feature spheres and a
/// field of small random ones.
fn build_scene() -> HittableList {
    let mut world = HittableList::new();

    // Ground
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));

    // Three feature spheres; the glass material is shared with the small
    // glass spheres below
    let glass = Arc::new(Dielectric::new(1.5));

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        glass.clone(),
    )));

    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));

    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    // Small random spheres
    let mut rng = rand::thread_rng();

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f64 + 0.9 * sampling::gen_f64(&mut rng),
                0.2,
                b as f64 + 0.9 * sampling::gen_f64(&mut rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat = sampling::gen_f64(&mut rng);

            if choose_mat < 0.8 {
                // Diffuse
                let albedo = sampling::random_vec(&mut rng) * sampling::random_vec(&mut rng);
                world.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = sampling::random_vec_range(&mut rng, 0.5, 1.0);
                let fuzz = sampling::gen_range(&mut rng, 0.0, 0.5);
                world.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                // Glass
                world.add(Box::new(Sphere::new(center, 0.2, glass.clone())));
            }
        }
    }

    world
}
