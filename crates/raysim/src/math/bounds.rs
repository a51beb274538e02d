use super::{Scalar, Vec3};
use crate::ray::Ray;

/// Axis aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// A box that contains nothing and is absorbed by `union`.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |b, p| b.grow(*p))
    }

    pub fn grow(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn centroid(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    pub fn diag(&self) -> Vec3 {
        self.max - self.min
    }

    /// Slab test against the parametric interval `[t_min, t_max]`.
    ///
    /// We want min <= origin + t*dir <= max on every axis; dividing by the
    /// direction and intersecting the three per-axis intervals gives the
    /// entry and exit parameters.
    pub fn hit(&self, ray: &Ray, t_min: Scalar, t_max: Scalar) -> bool {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;

        let entry = t0.min(t1).max_element().max(t_min);
        let exit = t0.max(t1).min_element().min(t_max);

        entry <= exit
    }
}
