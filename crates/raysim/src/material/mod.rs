mod map;

pub use map::{ColorMap, ImageMap, IndexMap};

use rand::prelude::Distribution;

use crate::{
    color::Rgb,
    math::{
        consts,
        distributions::{CosineHemisphere, Frame, UniformUnitBall},
        vec::{ReflectVecExt, Vec3AsNonZero, Vec3SameDirExt},
        Scalar, Vec3,
    },
    ray::Ray,
    Rng,
};

/// BRDF families. Closed set, dispatched by match.
///
/// Every variant answers two questions: how much of a direct-light sample
/// is reflected toward the viewer (`compute`), and where does the path go
/// next and at what cost (`sample`).
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian { albedo: ColorMap },
    Metallic { tint: Rgb, roughness: Scalar },
}

impl Material {
    /// Reflected radiance for one direct-light sample.
    ///
    /// `light_ray` points from the shading point toward the light and
    /// `view_ray` is the ray that arrived at the point. Light arriving
    /// under the surface contributes nothing.
    pub fn compute(
        &self,
        light_ray: &Ray,
        _view_ray: &Ray,
        normal: Vec3,
        u: Scalar,
        v: Scalar,
    ) -> Rgb {
        match self {
            Material::Lambertian { albedo } => {
                let cos = normal.dot(light_ray.direction);
                if cos <= 0.0 {
                    return Rgb::BLACK;
                }
                albedo.color(u, v) * (cos * consts::FRAC_1_PI)
            }
            // A specular lobe has zero response to a point sample.
            Material::Metallic { .. } => Rgb::BLACK,
        }
    }

    /// Draw the outgoing bounce direction and its throughput weight.
    pub fn sample(
        &self,
        ray: &Ray,
        normal: Vec3,
        u: Scalar,
        v: Scalar,
        rng: &mut Rng,
    ) -> (Vec3, Rgb) {
        match self {
            Material::Lambertian { albedo } => {
                // Cosine-weighted lobe about the normal, oriented to the
                // side the ray came from. The pdf cancels both the cosine
                // and the 1/pi of the BRDF, leaving the albedo as weight.
                let n = normal.same_direction(-ray.direction);
                let direction = Frame::new(n).from_local(CosineHemisphere.sample(rng));
                (direction, albedo.color(u, v))
            }
            Material::Metallic { tint, roughness } => {
                let reflected = ray.direction.reflect(normal);
                let fuzzed = reflected + *roughness * UniformUnitBall.sample(rng);
                let direction = fuzzed
                    .into_non_zero(1e-6)
                    .filter(|d| d.dot(normal) * reflected.dot(normal) > 0.0)
                    .unwrap_or(reflected);
                (direction.normalize(), *tint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn white_lambert() -> Material {
        Material::Lambertian {
            albedo: ColorMap::Uniform(Rgb::WHITE),
        }
    }

    #[test]
    fn lambertian_rejects_back_facing_light() {
        let material = white_lambert();
        let below = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let view = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(material.compute(&below, &view, Vec3::Z, 0.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn lambertian_peaks_at_normal_incidence() {
        let material = white_lambert();
        let view = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let head_on = Ray::new(Vec3::ZERO, Vec3::Z);
        let grazing = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.02).normalize());

        let peak = material.compute(&head_on, &view, Vec3::Z, 0.0, 0.0);
        let low = material.compute(&grazing, &view, Vec3::Z, 0.0, 0.0);
        assert!((peak.0[0] - consts::FRAC_1_PI).abs() < 1e-6);
        assert!(low.0[0] < peak.0[0]);
    }

    #[test]
    fn lambertian_samples_stay_above_the_surface() {
        let material = white_lambert();
        let incoming = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let mut rng = crate::Rng::seed_from_u64(21);
        for _ in 0..256 {
            let (direction, weight) = material.sample(&incoming, Vec3::Z, 0.0, 0.0, &mut rng);
            assert!(direction.dot(Vec3::Z) >= 0.0);
            assert_eq!(weight, Rgb::WHITE);
        }
    }

    #[test]
    fn metallic_reflects_about_the_normal() {
        let material = Material::Metallic {
            tint: Rgb::splat(0.9),
            roughness: 0.0,
        };
        let incoming = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, -1.0));
        let mut rng = crate::Rng::seed_from_u64(22);
        let (direction, weight) = material.sample(&incoming, Vec3::Z, 0.0, 0.0, &mut rng);
        assert!((direction - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-5);
        assert_eq!(weight, Rgb::splat(0.9));
    }

    #[test]
    fn textured_albedo_follows_the_uv() {
        #[rustfmt::skip]
        let pixels = vec![
            255, 0, 0, 255,  0, 255, 0, 255,
            0, 0, 255, 255,  255, 255, 255, 255,
        ];
        let material = Material::Lambertian {
            albedo: ColorMap::Image(ImageMap::from_raw(2, 2, pixels)),
        };
        let light = Ray::new(Vec3::ZERO, Vec3::Z);
        let view = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let red = material.compute(&light, &view, Vec3::Z, 0.0, 0.0);
        let green = material.compute(&light, &view, Vec3::Z, 0.6, 0.0);
        assert!(red.0[0] > 0.0 && red.0[1] == 0.0);
        assert!(green.0[1] > 0.0 && green.0[0] == 0.0);
    }
}
