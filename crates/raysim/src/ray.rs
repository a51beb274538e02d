use std::ops::{Range, RangeInclusive};

use crate::math::{Scalar, Vec3};

/// A ray with a valid parametric interval.
///
/// Directions are normalized by the constructors; shadow rays carry a
/// clipped interval so they cannot overshoot the light they test.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub bounds: (Scalar, Scalar),
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (0.0, Scalar::INFINITY),
        }
    }

    pub fn with_range(origin: Vec3, direction: Vec3, range: Range<Scalar>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (range.start, range.end),
        }
    }

    pub fn range(&self) -> RangeInclusive<Scalar> {
        self.bounds.0..=self.bounds.1
    }

    pub fn at(&self, t: Scalar) -> Vec3 {
        self.origin + t * self.direction
    }
}
