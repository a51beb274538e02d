use bytemuck::{Pod, Zeroable};

use crate::math::Scalar;

/// Linear RGB radiance triple.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rgb(pub [Scalar; 3]);

impl Rgb {
    pub const BLACK: Self = Self([0.0; 3]);
    pub const WHITE: Self = Self([1.0; 3]);

    pub const fn from_array(arr: [Scalar; 3]) -> Self {
        Self(arr)
    }

    pub const fn to_array(self) -> [Scalar; 3] {
        self.0
    }

    pub const fn splat(v: Scalar) -> Self {
        Self([v; 3])
    }

    pub fn clamp01(self) -> Self {
        Self(self.0.map(|c| c.clamp(0.0, 1.0)))
    }

    pub fn length(self) -> Scalar {
        let [r, g, b] = self.0;
        Scalar::sqrt(r * r + g * g + b * b)
    }

    /// Quantize to the output byte format: each channel scaled by 256,
    /// clamped to [0, 255] and truncated; alpha fixed opaque.
    pub fn quantize(self) -> Rgba8 {
        let q = |c: Scalar| (c * 256.0).clamp(0.0, 255.0) as u8;
        Rgba8([q(self.0[0]), q(self.0[1]), q(self.0[2]), q(1.0)])
    }
}

/// One output pixel; `Pod` so whole frames can be viewed as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Rgba8(pub [u8; 4]);

impl std::ops::Add for Rgb {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl std::ops::AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Rgb {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self([
            self.0[0] - rhs.0[0],
            self.0[1] - rhs.0[1],
            self.0[2] - rhs.0[2],
        ])
    }
}

/// Channel-wise product, used for path throughput.
impl std::ops::Mul for Rgb {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self([
            self.0[0] * rhs.0[0],
            self.0[1] * rhs.0[1],
            self.0[2] * rhs.0[2],
        ])
    }
}

impl std::ops::MulAssign for Rgb {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<Scalar> for Rgb {
    type Output = Self;

    fn mul(self, rhs: Scalar) -> Self {
        Self(self.0.map(|c| c * rhs))
    }
}

impl std::ops::Mul<Rgb> for Scalar {
    type Output = Rgb;

    fn mul(self, rhs: Rgb) -> Rgb {
        rhs * self
    }
}

impl std::ops::Div<Scalar> for Rgb {
    type Output = Self;

    fn div(self, rhs: Scalar) -> Self {
        Self(self.0.map(|c| c / rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps_and_scales() {
        assert_eq!(Rgb::BLACK.quantize(), Rgba8([0, 0, 0, 255]));
        assert_eq!(Rgb::WHITE.quantize(), Rgba8([255, 255, 255, 255]));
        assert_eq!(Rgb::splat(0.5).quantize(), Rgba8([128, 128, 128, 255]));
        assert_eq!(Rgb::splat(-2.0).quantize(), Rgba8([0, 0, 0, 255]));
        assert_eq!(Rgb::splat(7.0).quantize(), Rgba8([255, 255, 255, 255]));
    }

    #[test]
    fn throughput_product_is_channel_wise() {
        let a = Rgb::from_array([0.5, 1.0, 0.0]);
        let b = Rgb::from_array([0.5, 0.25, 3.0]);
        assert_eq!(a * b, Rgb::from_array([0.25, 0.25, 0.0]));
    }

    #[test]
    fn frames_cast_to_bytes() {
        let frame = vec![Rgba8([1, 2, 3, 255]); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&frame);
        assert_eq!(bytes, &[1, 2, 3, 255, 1, 2, 3, 255]);
    }
}
