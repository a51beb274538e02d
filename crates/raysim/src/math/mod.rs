pub mod bounds;
pub mod distributions;
pub mod stat;
pub mod vec;

#[cfg(not(feature = "f64"))]
mod scalar {
    pub type Scalar = f32;
    pub type Vec2 = glam::Vec2;
    pub type Vec3 = glam::Vec3;
    pub type Mat3 = glam::Mat3;
    pub use std::f32::consts;
}

#[cfg(feature = "f64")]
mod scalar {
    pub type Scalar = f64;
    pub type Vec2 = glam::DVec2;
    pub type Vec3 = glam::DVec3;
    pub type Mat3 = glam::DMat3;
    pub use std::f64::consts;
}

pub use scalar::*;

/// Build a rotation matrix from its three rows.
///
/// Poses are specified row-major (the convention of the sensor models);
/// glam stores matrices by column, hence the transpose.
pub fn mat3_from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Mat3 {
    Mat3::from_cols(r0, r1, r2).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat3_from_rows_is_row_major() {
        let m = mat3_from_rows(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        // Row 1 dotted with +Z must give -1.
        assert_eq!(m * Vec3::Z, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(m * Vec3::X, Vec3::new(0.0, 0.0, 1.0));
    }
}
