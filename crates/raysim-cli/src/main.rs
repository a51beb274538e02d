use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use raysim::{
    camera::{Camera, PinholeCamera},
    color::Rgb,
    lidar::{Lidar, Pose, SimpleLidar},
    light::{Light, PointLight},
    loader,
    material::{ColorMap, IndexMap, Material},
    math::{Mat3, Scalar, Vec3},
    renderer::{self, RenderSettings},
    scene::Scene,
    shape::Triangle,
    surface::Surface,
};

#[derive(Parser, Debug)]
#[command(name = "raysim", about = "Offline renderer and ranging-sensor simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Path-trace the scene through a pinhole camera and write a PNG.
    Render(RenderArgs),
    /// Fire a lidar at the scene and print the averaged range.
    Range(RangeArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// OBJ model to render; a built-in demo scene is used when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Camera focal length, in the same units as the sensor size.
    #[arg(long, default_value_t = 30.0)]
    focal_length: Scalar,

    /// Physical sensor side length.
    #[arg(long, default_value_t = 19.5)]
    sensor_size: Scalar,

    /// Distance from the camera to the scene along the boresight.
    #[arg(long, default_value_t = 6.0)]
    distance: Scalar,

    #[arg(long, default_value_t = 1)]
    min_samples: u32,

    #[arg(long, default_value_t = 16)]
    max_samples: u32,

    #[arg(long, default_value_t = 1e-5)]
    noise_threshold: Scalar,

    #[arg(long, default_value_t = 2)]
    bounces: u32,

    /// Base seed; the output only depends on the scene, the settings and
    /// this value.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Disable the [0,1] clamp on radiance gathered after the first bounce.
    #[arg(long)]
    no_indirect_clamp: bool,

    /// Shade with flat face normals instead of interpolated vertex normals.
    #[arg(long)]
    flat: bool,

    #[arg(long, default_value_t = 40.0)]
    light_intensity: Scalar,
}

#[derive(clap::Args, Debug)]
struct RangeArgs {
    /// OBJ model to range against; a flat wall is used when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Distance from the sensor to the target along the boresight.
    #[arg(long, default_value_t = 7.5)]
    distance: Scalar,

    #[arg(long, default_value_t = 16)]
    rays: u32,
}

fn white_lambert() -> Vec<Arc<Material>> {
    vec![Arc::new(Material::Lambertian {
        albedo: ColorMap::Uniform(Rgb::WHITE),
    })]
}

/// Square wall facing +Z, centered on the origin.
fn wall_triangles(half: Scalar) -> Vec<Triangle> {
    vec![
        Triangle::flat([
            Vec3::new(-half, -half, 0.0),
            Vec3::new(half, -half, 0.0),
            Vec3::new(half, half, 0.0),
        ]),
        Triangle::flat([
            Vec3::new(-half, -half, 0.0),
            Vec3::new(half, half, 0.0),
            Vec3::new(-half, half, 0.0),
        ]),
    ]
}

/// Fallback scene: a wall with a floating blocker that casts a soft-edged
/// shadow under the point light.
fn demo_surfaces(distance: Scalar) -> Vec<Surface> {
    let mut wall = Surface::from_local_triangles(
        wall_triangles(4.0),
        white_lambert(),
        IndexMap::Constant(0),
        false,
    );
    wall.set_position(Vec3::new(0.0, 0.0, -distance));

    let mut blocker = Surface::from_local_triangles(
        vec![Triangle::flat([
            Vec3::new(-0.8, -0.5, 0.0),
            Vec3::new(0.8, -0.5, 0.0),
            Vec3::new(0.0, 0.9, 0.0),
        ])],
        vec![Arc::new(Material::Lambertian {
            albedo: ColorMap::Uniform(Rgb::from_array([0.8, 0.3, 0.2])),
        })],
        IndexMap::Constant(0),
        false,
    );
    blocker.set_position(Vec3::new(0.4, 0.4, -(distance - 2.0)));

    vec![wall, blocker]
}

fn model_surface(path: &PathBuf, distance: Scalar, smooth: bool) -> Result<Surface> {
    let mesh = loader::load_obj(path)?;
    let mut surface = Surface::new(mesh, white_lambert(), IndexMap::Constant(0), smooth);
    surface.set_position(Vec3::new(0.0, 0.0, -distance));
    Ok(surface)
}

fn run_render(args: RenderArgs) -> Result<()> {
    let camera = Camera::Pinhole(PinholeCamera::new(
        args.focal_length,
        [args.width as Scalar, args.height as Scalar],
        [args.sensor_size, args.sensor_size],
    ));

    let mut scene = Scene::new();
    match &args.model {
        Some(path) => {
            scene.insert_surface(model_surface(path, args.distance, !args.flat)?);
        }
        None => {
            for surface in demo_surfaces(args.distance) {
                scene.insert_surface(surface);
            }
        }
    }

    let mut sun = PointLight::new(args.light_intensity);
    sun.position = Vec3::new(3.0, 3.0, 2.0);
    scene.insert_light(Light::Point(sun));

    let settings = RenderSettings {
        min_samples: args.min_samples,
        max_samples: args.max_samples,
        noise_threshold: args.noise_threshold,
        num_bounces: args.bounces,
        clamp_indirect: !args.no_indirect_clamp,
        seed: args.seed,
    };

    let buffer = renderer::render(&camera, &scene, &settings);
    let image = image::RgbaImage::from_raw(args.width, args.height, buffer)
        .context("assembling output image")?;
    image
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

fn run_range(args: RangeArgs) -> Result<()> {
    let mut scene = Scene::new();
    match &args.model {
        Some(path) => {
            scene.insert_surface(model_surface(path, args.distance, false)?);
        }
        None => {
            let mut wall = Surface::from_local_triangles(
                wall_triangles(5.0),
                white_lambert(),
                IndexMap::Constant(0),
                false,
            );
            wall.set_position(Vec3::new(0.0, 0.0, -args.distance));
            scene.insert_surface(wall);
        }
    }
    let index = scene.build_index();

    let lidar = Lidar::Simple(SimpleLidar::new(false));
    let range = raysim::lidar::measure_range(&lidar, &index, args.rays);
    println!("{range}");

    // A short sweep along the boresight as a batched example.
    let poses: Vec<Pose> = (0..3)
        .map(|i| Pose {
            position: Vec3::new(0.0, 0.0, -(i as Scalar)),
            rotation: Mat3::IDENTITY,
        })
        .collect();
    for (pose, range) in poses
        .iter()
        .zip(raysim::lidar::measure_range_batch(&lidar, &poses, &index, args.rays))
    {
        log::info!("pose z={} range={range}", pose.position.z);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Render(args) => run_render(args),
        Command::Range(args) => run_range(args),
    }
}
