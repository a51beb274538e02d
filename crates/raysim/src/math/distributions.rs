use rand::{distributions::Uniform, prelude::Distribution, Rng};

use super::{consts, Mat3, Scalar, Vec3};

/// Cosine-weighted direction on the +Z hemisphere.
///
/// Sampling a disk uniformly and projecting up weighs directions by
/// cos(theta), which cancels the cosine term of a Lambertian estimator.
pub struct CosineHemisphere;

impl Distribution<Vec3> for CosineHemisphere {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let uniform = Uniform::new(0.0, 1.0);
        let phi = consts::TAU * uniform.sample(rng);
        let r = Scalar::sqrt(uniform.sample(rng));
        let (s, c) = Scalar::sin_cos(phi);

        let (x, y) = (r * c, r * s);
        let z = Scalar::sqrt(Scalar::max(0.0, 1.0 - x * x - y * y));
        Vec3::new(x, y, z)
    }
}

/// Uniform point in the unit ball, by rejection.
pub struct UniformUnitBall;

impl Distribution<Vec3> for UniformUnitBall {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let uniform = Uniform::new(-1.0, 1.0);
        loop {
            let v = Vec3::new(
                uniform.sample(rng),
                uniform.sample(rng),
                uniform.sample(rng),
            );
            if v.length_squared() <= 1.0 {
                return v;
            }
        }
    }
}

/// Orthonormal frame with `n` as the +Z axis.
///
/// Construction from “Building an Orthonormal Basis, Revisited” (JCGT 2017);
/// `n` is expected to be normalized.
pub struct Frame {
    frame: Mat3,
}

impl Frame {
    pub fn new(n: Vec3) -> Self {
        let sign = Scalar::signum(n.z);
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;

        Self {
            frame: Mat3::from_cols(
                Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x),
                Vec3::new(b, sign + n.y * n.y * a, -n.y),
                n,
            ),
        }
    }

    pub fn from_local(&self, local: Vec3) -> Vec3 {
        self.frame * local
    }

    pub fn to_local(&self, global: Vec3) -> Vec3 {
        self.frame.transpose() * global
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn cosine_hemisphere_stays_above_plane() {
        let mut rng = crate::Rng::seed_from_u64(3);
        for _ in 0..256 {
            let v = CosineHemisphere.sample(&mut rng);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn unit_ball_is_bounded() {
        let mut rng = crate::Rng::seed_from_u64(4);
        for _ in 0..256 {
            assert!(UniformUnitBall.sample(&mut rng).length() <= 1.0);
        }
    }

    #[test]
    fn frame_is_orthonormal() {
        for n in [Vec3::Z, Vec3::NEG_Z, Vec3::new(0.3, -0.5, 0.8).normalize()] {
            let f = Frame::new(n);
            let x = f.from_local(Vec3::X);
            let y = f.from_local(Vec3::Y);
            let z = f.from_local(Vec3::Z);
            assert!((z - n).length() < 1e-5);
            assert!(x.dot(y).abs() < 1e-5);
            assert!(x.dot(z).abs() < 1e-5);
            assert!((x.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn frame_round_trips() {
        let f = Frame::new(Vec3::new(0.1, 0.2, -0.9).normalize());
        let v = Vec3::new(0.4, -0.2, 0.6);
        assert!((f.to_local(f.from_local(v)) - v).length() < 1e-5);
    }
}
