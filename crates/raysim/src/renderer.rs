//! The stochastic path-tracing integrator and the auxiliary geometry pass.
//!
//! One pass = build the intersection index once, then walk every pixel in
//! parallel. Workers share the index, surfaces and lights read-only and
//! each owns a deterministic RNG stream derived from the pass seed and its
//! pixel coordinate.

use rand::{distributions::Uniform, prelude::Distribution};
use rayon::prelude::*;

use crate::{
    aggregate::{Bvh, Intersector},
    camera::Camera,
    color::{Rgb, Rgba8},
    material::Material,
    math::{consts, stat::RadianceSeries, vec::Vec3SameDirExt, Scalar, Vec2, Vec3},
    ray::Ray,
    scene::Scene,
    utils::timer::timed_scope_log,
    Rng, Seed,
};

/// Fixed displacement applied to a shading point, along the geometric
/// normal and away from the incoming ray, before tracing shadow or bounce
/// rays. Tuning parameter, not physically derived.
pub const SELF_INTERSECT_BIAS: Scalar = 1e-4;

/// Sampling knobs for one render pass.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub min_samples: u32,
    pub max_samples: u32,
    /// Adaptive cutoff: once `min_samples` are in, a pixel stops as soon as
    /// one sample's mean correction falls below this magnitude.
    pub noise_threshold: Scalar,
    pub num_bounces: u32,
    /// Clamp per-bounce direct radiance to [0,1] after the first bounce.
    /// Suppresses fireflies from secondary bounces; intentionally
    /// non-physical.
    pub clamp_indirect: bool,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            min_samples: 1,
            max_samples: 1,
            noise_threshold: 1.0,
            num_bounces: 1,
            clamp_indirect: true,
            seed: 0,
        }
    }
}

/// Render the scene into a row-major RGBA byte buffer of size
/// `4 * width * height`, where width and height are the camera resolution
/// rounded down.
pub fn render(camera: &Camera, scene: &Scene, settings: &RenderSettings) -> Vec<u8> {
    let width = camera.resolution_x().floor() as usize;
    let height = camera.resolution_y().floor() as usize;

    let index = timed_scope_log("bvh build", || scene.build_index()).res;
    log::info!(
        "rendering {}x{} over {} triangles",
        width,
        height,
        index.triangles().len()
    );

    let mut frame = vec![Rgba8([0, 0, 0, 0]); width * height];
    timed_scope_log("trace", || {
        frame
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let mut rng = Seed {
                        seed: settings.seed,
                        x: x as u32,
                        y: y as u32,
                    }
                    .into_rng();
                    *pixel = render_pixel(camera, scene, &index, settings, x, y, &mut rng)
                        .quantize();
                }
            });
    });

    bytemuck::cast_slice(&frame).to_vec()
}

/// One primary ray per pixel; stores the barycentric-interpolated hit point
/// (zeros on a miss) into a row-major `3 * width * height` buffer.
pub fn intersection_pass(camera: &Camera, scene: &Scene) -> Vec<Scalar> {
    let width = camera.resolution_x().floor() as usize;
    let height = camera.resolution_y().floor() as usize;

    let index = timed_scope_log("bvh build", || scene.build_index()).res;

    let mut buffer = vec![0.0; 3 * width * height];
    buffer
        .par_chunks_mut(3 * width)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let ray = camera.pixel_to_ray(x as Scalar, y as Scalar);
                if let Some(hit) = index.closest_hit(&ray) {
                    let tri = &index.triangles()[hit.prim as usize];
                    let point = tri.point_at(hit.u, hit.v);
                    row[3 * x] = point.x;
                    row[3 * x + 1] = point.y;
                    row[3 * x + 2] = point.z;
                }
            }
        });

    buffer
}

fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    index: &Bvh,
    settings: &RenderSettings,
    x: usize,
    y: usize,
    rng: &mut Rng,
) -> Rgb {
    let jitter = Uniform::new(-0.5, 0.5);
    let mut series = RadianceSeries::new();

    for sample in 1..=settings.max_samples.max(1) {
        // A single-sample pass shoots through the exact pixel coordinate;
        // anything more jitters within the pixel footprint.
        let ray = if settings.max_samples == 1 {
            camera.pixel_to_ray(x as Scalar, y as Scalar)
        } else {
            camera.pixel_to_ray(
                x as Scalar + jitter.sample(rng),
                y as Scalar + jitter.sample(rng),
            )
        };

        let path_radiance = trace_path(scene, index, settings, ray, rng);
        let contribution = series.add_sample(path_radiance);

        if sample >= settings.min_samples && contribution < settings.noise_threshold {
            break;
        }
    }

    series.mean()
}

/// Estimate the radiance carried back along one camera ray.
fn trace_path(
    scene: &Scene,
    index: &Bvh,
    settings: &RenderSettings,
    mut ray: Ray,
    rng: &mut Rng,
) -> Rgb {
    let triangles = index.triangles();
    let mut hit = index.closest_hit(&ray);

    // With no bounce budget the pass degrades to a normal visualization of
    // the primary hit.
    if settings.num_bounces == 0 {
        return match hit {
            Some(h) => {
                let tri = &triangles[h.prim as usize];
                let smooth = scene.surfaces[tri.surface as usize].smooth_shading;
                let n = tri.shading_normal(h.u, h.v, smooth);
                Rgb::from_array([n.x.abs(), n.y.abs(), n.z.abs()])
            }
            None => Rgb::BLACK,
        };
    }

    let mut path_radiance = Rgb::BLACK;
    // Solid-angle normalization carried as the initial throughput.
    let mut throughput = Rgb::splat(consts::TAU);

    for bounce in 0..settings.num_bounces {
        let Some(h) = hit else {
            break;
        };
        let tri = &triangles[h.prim as usize];
        let surface = &scene.surfaces[tri.surface as usize];

        let shading_normal = tri.shading_normal(h.u, h.v, surface.smooth_shading);
        let uv = tri.uv_at(h.u, h.v);
        let material = surface.material(uv.x, uv.y);

        // Nudge the shading point off the surface, toward the side the ray
        // came from, so the next traced ray cannot re-hit this triangle.
        let away = tri.normal.same_direction(-ray.direction);
        let point = tri.point_at(h.u, h.v) + SELF_INTERSECT_BIAS * away;

        let mut light_radiance = Rgb::BLACK;
        for light in &scene.lights {
            let light_sample = light.sample_ray(point, rng);
            let color = illumination(index, &light_sample.ray, &ray, shading_normal, uv, material);
            light_radiance += color * light.intensity_at(point, &light_sample);
        }

        if bounce >= 1 && settings.clamp_indirect {
            light_radiance = light_radiance.clamp01();
        }

        path_radiance += light_radiance * throughput;

        if bounce + 1 == settings.num_bounces {
            break;
        }

        let (direction, weight) = material.sample(&ray, shading_normal, uv.x, uv.y, rng);
        ray = Ray::new(point, direction);
        hit = index.closest_hit(&ray);
        throughput *= weight;
    }

    path_radiance
}

/// Direct contribution of one light sample: zero when occluded, the
/// material's response otherwise.
fn illumination(
    index: &Bvh,
    light_ray: &Ray,
    view_ray: &Ray,
    normal: Vec3,
    uv: Vec2,
    material: &Material,
) -> Rgb {
    if index.any_hit(light_ray) {
        Rgb::BLACK
    } else {
        material.compute(light_ray, view_ray, normal, uv.x, uv.y)
    }
}
