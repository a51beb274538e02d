use crate::{
    math::{Mat3, Scalar, Vec3},
    ray::Ray,
};

/// Projection models a sensor can use. Closed set, dispatched by match.
#[derive(Debug, Clone)]
pub enum Camera {
    Pinhole(PinholeCamera),
}

impl Camera {
    /// Map a (possibly fractional) pixel coordinate to a world-space ray.
    /// No bounds checking happens here.
    pub fn pixel_to_ray(&self, u: Scalar, v: Scalar) -> Ray {
        match self {
            Camera::Pinhole(c) => c.pixel_to_ray(u, v),
        }
    }

    pub fn resolution_x(&self) -> Scalar {
        match self {
            Camera::Pinhole(c) => c.resolution[0],
        }
    }

    pub fn resolution_y(&self) -> Scalar {
        match self {
            Camera::Pinhole(c) => c.resolution[1],
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Camera::Pinhole(c) => c.position,
        }
    }

    pub fn set_pose(&mut self, position: Vec3, rotation: Mat3) {
        match self {
            Camera::Pinhole(c) => c.set_pose(position, rotation),
        }
    }
}

/// Ideal pinhole projection.
///
/// The projection constants (`center`, `scale`, intrinsic matrix) are
/// derived once at construction from focal length, resolution and sensor
/// size. `set_pose` only moves the camera; it never touches them.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    pub position: Vec3,
    pub rotation: Mat3,

    pub focal_length: Scalar,
    /// Pixel counts, `[x, y]`.
    pub resolution: [Scalar; 2],
    /// Physical sensor extents in world units, `[x, y]`.
    pub sensor_size: [Scalar; 2],

    center: [Scalar; 2],
    scale: [Scalar; 2],
    k: Mat3,
}

impl PinholeCamera {
    pub fn new(focal_length: Scalar, resolution: [Scalar; 2], sensor_size: [Scalar; 2]) -> Self {
        let center = [resolution[0] / 2.0, resolution[1] / 2.0];
        let scale = [
            resolution[0] / sensor_size[0],
            resolution[1] / sensor_size[1],
        ];
        let k = Mat3::from_cols(
            Vec3::new(focal_length, 0.0, 0.0),
            Vec3::new(0.0, focal_length, 0.0),
            Vec3::new(center[0], center[1], 1.0),
        );

        Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            focal_length,
            resolution,
            sensor_size,
            center,
            scale,
            k,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Mat3) {
        self.rotation = rotation;
    }

    pub fn set_pose(&mut self, position: Vec3, rotation: Mat3) {
        self.set_position(position);
        self.set_rotation(rotation);
    }

    pub fn principal_point(&self) -> [Scalar; 2] {
        self.center
    }

    pub fn pixel_scale(&self) -> [Scalar; 2] {
        self.scale
    }

    pub fn intrinsic_matrix(&self) -> Mat3 {
        self.k
    }

    pub fn pixel_to_ray(&self, u: Scalar, v: Scalar) -> Ray {
        // Camera-frame direction: +x right, +y up, boresight along -z.
        let dir = Vec3::new(
            (u - self.center[0]) / self.scale[0],
            (self.center[1] - v) / self.scale[1],
            -self.focal_length,
        )
        .normalize();

        // Camera frame to world frame uses the TRANSPOSE of the stored
        // rotation; the matrix itself maps world to camera.
        Ray::new(self.position, self.rotation.transpose() * dir)
    }
}

#[cfg(test)]
mod tests {
    use crate::math::mat3_from_rows;

    use super::*;

    fn camera() -> PinholeCamera {
        PinholeCamera::new(30.0, [500.0, 500.0], [20.0, 20.0])
    }

    #[test]
    fn rays_are_unit_length() {
        let cam = camera();
        for (u, v) in [(0.0, 0.0), (250.0, 250.0), (499.5, 13.25)] {
            let ray = cam.pixel_to_ray(u, v);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn center_pixel_looks_down_boresight() {
        let cam = camera();
        let ray = cam.pixel_to_ray(250.0, 250.0);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn rotation_is_applied_transposed() {
        // The pose used by the reference scene: a camera on +X looking at
        // the origin. The boresight must come out as -X.
        let mut cam = camera();
        cam.set_pose(
            Vec3::new(10.0, 0.0, 0.0),
            mat3_from_rows(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ),
        );
        let ray = cam.pixel_to_ray(250.0, 250.0);
        assert!((ray.direction - Vec3::NEG_X).length() < 1e-6);
        assert_eq!(ray.origin, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn set_pose_leaves_intrinsics_alone() {
        let mut cam = camera();
        let (center, scale, k) = (cam.principal_point(), cam.pixel_scale(), cam.intrinsic_matrix());
        cam.set_pose(Vec3::splat(4.0), mat3_from_rows(Vec3::Y, Vec3::Z, Vec3::X));
        assert_eq!(cam.principal_point(), center);
        assert_eq!(cam.pixel_scale(), scale);
        assert_eq!(cam.intrinsic_matrix(), k);
    }

    #[test]
    fn resolution_accessors() {
        let cam = Camera::Pinhole(PinholeCamera::new(30.0, [640.0, 480.0], [20.0, 15.0]));
        assert_eq!(cam.resolution_x(), 640.0);
        assert_eq!(cam.resolution_y(), 480.0);
    }
}
