use super::{Scalar, Vec3};

pub trait ReflectVecExt {
    fn reflect(self, normal: Vec3) -> Vec3;
}

impl ReflectVecExt for Vec3 {
    fn reflect(self, normal: Vec3) -> Vec3 {
        self - (2.0 * self.dot(normal) * normal)
    }
}

pub trait Vec3SameDirExt {
    fn same_direction(self, other: Self) -> Self;
}

impl Vec3SameDirExt for Vec3 {
    /// Return self flipped, if needed, so it points into the same half-space
    /// as `other`.
    fn same_direction(self, other: Self) -> Self {
        if self.dot(other) >= 0.0 {
            self
        } else {
            -self
        }
    }
}

pub trait Vec3AsNonZero: Sized {
    fn into_non_zero(self, eps: Scalar) -> Option<Self>;
}

impl Vec3AsNonZero for Vec3 {
    fn into_non_zero(self, eps: Scalar) -> Option<Self> {
        if self.length_squared() > eps * eps {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_mirrors_about_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = d.reflect(Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn same_direction_flips_only_when_opposed() {
        let n = Vec3::Z;
        assert_eq!(n.same_direction(Vec3::new(0.1, 0.0, 1.0)), n);
        assert_eq!(n.same_direction(Vec3::new(0.1, 0.0, -1.0)), -n);
    }

    #[test]
    fn non_zero_guard() {
        assert!(Vec3::new(1e-8, 0.0, 0.0).into_non_zero(1e-4).is_none());
        assert!(Vec3::X.into_non_zero(1e-4).is_some());
    }
}
