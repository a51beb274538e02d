use rand::{distributions::Uniform, prelude::Distribution};

use crate::{
    math::{Mat3, Scalar, Vec3},
    ray::Ray,
    Rng,
};

/// Point-light intensity is capped so a shading point sitting on the light
/// does not blow up the estimator.
pub const INTENSITY_CAP: Scalar = 10_000.0;

/// Light models. Closed set, dispatched by match.
#[derive(Debug, Clone)]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}

/// One light-sampling event: the shadow ray and the point on the light it
/// was aimed at, returned together so the follow-up intensity query always
/// sees the same sample. There is no per-instance state to race on.
#[derive(Debug, Clone)]
pub struct LightSample {
    pub ray: Ray,
    pub point: Vec3,
}

impl Light {
    /// Draw a shadow-test ray from `origin` toward the light. The ray's
    /// valid interval is clipped to the sampled point so occluders behind
    /// the light do not count.
    pub fn sample_ray(&self, origin: Vec3, rng: &mut Rng) -> LightSample {
        match self {
            Light::Point(l) => l.sample_ray(origin),
            Light::Area(l) => l.sample_ray(origin, rng),
        }
    }

    /// Attenuated intensity at `point` for the given sampling event.
    pub fn intensity_at(&self, point: Vec3, sample: &LightSample) -> Scalar {
        match self {
            Light::Point(l) => l.intensity_at(point),
            Light::Area(l) => l.intensity_at(point, sample),
        }
    }

    pub fn set_pose(&mut self, position: Vec3, rotation: Mat3) {
        match self {
            // A point source has no orientation to speak of.
            Light::Point(l) => l.position = position,
            Light::Area(l) => {
                l.position = position;
                l.rotation = rotation;
            }
        }
    }
}

/// Isotropic point source with inverse-square falloff.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Scalar,
}

impl PointLight {
    pub fn new(intensity: Scalar) -> Self {
        Self {
            position: Vec3::ZERO,
            intensity,
        }
    }

    fn sample_ray(&self, origin: Vec3) -> LightSample {
        let to_light = self.position - origin;
        LightSample {
            ray: Ray::with_range(origin, to_light, 0.0..to_light.length()),
            point: self.position,
        }
    }

    fn intensity_at(&self, point: Vec3) -> Scalar {
        Scalar::min(
            self.intensity / point.distance_squared(self.position),
            INTENSITY_CAP,
        )
    }
}

/// Rectangular emitter centered on its own origin, extents given by `size`.
#[derive(Debug, Clone)]
pub struct AreaLight {
    pub position: Vec3,
    pub rotation: Mat3,
    /// Rectangle extents `[x, y]` in the light's local frame.
    pub size: [Scalar; 2],
    pub intensity: Scalar,
}

impl AreaLight {
    pub fn new(size: [Scalar; 2], intensity: Scalar) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            size,
            intensity,
        }
    }

    fn sample_ray(&self, origin: Vec3, rng: &mut Rng) -> LightSample {
        let uniform = Uniform::new(0.0, 1.0);
        let x = self.size[0] * uniform.sample(rng) - self.size[0] / 2.0;
        let y = self.size[1] * uniform.sample(rng) - self.size[1] / 2.0;

        let point = self.rotation * Vec3::new(x, y, 0.0) + self.position;
        let to_light = point - origin;
        LightSample {
            ray: Ray::with_range(origin, to_light, 0.0..to_light.length()),
            point,
        }
    }

    /// Falloff is measured against the point sampled for this event, not
    /// the light's nominal center. Uncapped.
    fn intensity_at(&self, point: Vec3, sample: &LightSample) -> Scalar {
        self.intensity / point.distance_squared(sample.point)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::math::mat3_from_rows;

    use super::*;

    #[test]
    fn point_intensity_decreases_with_distance() {
        let mut light = PointLight::new(100.0);
        light.position = Vec3::ZERO;
        let mut previous = Scalar::INFINITY;
        for d in [0.5, 1.0, 2.0, 4.0, 50.0] {
            let i = light.intensity_at(Vec3::new(d, 0.0, 0.0));
            assert!(i <= previous);
            previous = i;
        }
    }

    #[test]
    fn point_intensity_never_exceeds_cap() {
        let light = PointLight::new(7.0);
        let i = light.intensity_at(Vec3::new(1e-6, 0.0, 0.0));
        assert_eq!(i, INTENSITY_CAP);
    }

    #[test]
    fn point_shadow_ray_is_clipped_to_the_light() {
        let mut light = PointLight::new(1.0);
        light.position = Vec3::new(0.0, 0.0, 3.0);
        let sample = light.sample_ray(Vec3::ZERO);
        assert_eq!(sample.ray.bounds.1, 3.0);
        assert!((sample.ray.direction - Vec3::Z).length() < 1e-6);
        assert_eq!(sample.point, light.position);
    }

    #[test]
    fn area_samples_stay_on_the_rectangle() {
        let mut rng = crate::Rng::seed_from_u64(11);
        let mut light = Light::Area(AreaLight::new([2.0, 4.0], 1.0));
        light.set_pose(Vec3::new(0.0, 0.0, 5.0), Mat3::IDENTITY);

        for _ in 0..128 {
            let sample = light.sample_ray(Vec3::ZERO, &mut rng);
            assert!(sample.point.x.abs() <= 1.0);
            assert!(sample.point.y.abs() <= 2.0);
            assert_eq!(sample.point.z, 5.0);
            // Ray interval must end exactly on the sampled point.
            assert!((sample.ray.at(sample.ray.bounds.1) - sample.point).length() < 1e-4);
        }
    }

    #[test]
    fn area_intensity_uses_the_sampled_point() {
        let mut rng = crate::Rng::seed_from_u64(12);
        // Rotate the rectangle into the XZ plane to make the pose matter.
        let mut light = Light::Area(AreaLight::new([2.0, 2.0], 9.0));
        light.set_pose(
            Vec3::new(0.0, 3.0, 0.0),
            mat3_from_rows(Vec3::X, Vec3::Z, Vec3::NEG_Y),
        );

        let shading_point = Vec3::ZERO;
        let sample = light.sample_ray(shading_point, &mut rng);
        let expected = 9.0 / shading_point.distance_squared(sample.point);
        assert_eq!(light.intensity_at(shading_point, &sample), expected);
    }
}
