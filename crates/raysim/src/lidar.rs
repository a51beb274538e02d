//! Ranging simulation: trace sensor beams against the intersection index
//! and reduce each batch of rays to one averaged distance.

use rayon::prelude::*;

use crate::{
    aggregate::{Bvh, Intersector},
    math::{Mat3, Scalar, Vec3},
    ray::Ray,
};

/// Rigid-body pose of a sensor, independent of any single ray.
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Mat3,
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
        }
    }
}

/// Ranging-sensor models. Closed set, dispatched by match.
#[derive(Debug, Clone)]
pub enum Lidar {
    Simple(SimpleLidar),
}

impl Lidar {
    pub fn cast_rays(&self, num_rays: u32) -> Vec<Ray> {
        match self {
            Lidar::Simple(l) => l.cast_rays(num_rays),
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Lidar::Simple(l) => l.position,
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        match self {
            Lidar::Simple(l) => {
                l.position = pose.position;
                l.rotation = pose.rotation;
            }
        }
    }
}

/// The simplest ranging sensor: a single fixed boresight beam along the
/// z-axis (sign chosen by `z_positive`), repeated `num_rays` times.
#[derive(Debug, Clone)]
pub struct SimpleLidar {
    pub position: Vec3,
    pub rotation: Mat3,
    pub z_positive: bool,
}

impl SimpleLidar {
    pub fn new(z_positive: bool) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            z_positive,
        }
    }

    fn cast_rays(&self, num_rays: u32) -> Vec<Ray> {
        let beam = if self.z_positive { Vec3::Z } else { Vec3::NEG_Z };
        // Beam direction maps to the world frame through the transpose of
        // the stored rotation, the same convention the cameras use.
        let direction = self.rotation.transpose() * beam;

        vec![Ray::new(self.position, direction); num_rays.max(1) as usize]
    }
}

/// Average distance over one batch of rays from the sensor's current pose.
///
/// A missing return is recorded as distance 0, which drags the average
/// toward the sensor and is indistinguishable from a target at zero range.
/// Known defect, kept for compatibility; see the all-miss test below.
pub fn measure_range(lidar: &Lidar, index: &Bvh, num_rays: u32) -> Scalar {
    let origin = lidar.position();
    let rays = lidar.cast_rays(num_rays);

    let total: Scalar = rays
        .iter()
        .map(|ray| match index.closest_hit(ray) {
            Some(hit) => {
                let tri = &index.triangles()[hit.prim as usize];
                (tri.point_at(hit.u, hit.v) - origin).length()
            }
            None => 0.0,
        })
        .sum();

    total / rays.len() as Scalar
}

/// One averaged range per pose, each batch entry computed independently.
pub fn measure_range_batch(
    lidar: &Lidar,
    poses: &[Pose],
    index: &Bvh,
    num_rays: u32,
) -> Vec<Scalar> {
    poses
        .par_iter()
        .map(|pose| {
            let mut sensor = lidar.clone();
            sensor.set_pose(pose);
            measure_range(&sensor, index, num_rays)
        })
        .collect()
}
