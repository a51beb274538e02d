use crate::color::Rgb;

use super::Scalar;

/// Running mean of radiance samples, updated incrementally.
///
/// `add_sample` folds one path estimate into the mean and returns the
/// magnitude of the correction it applied, which is the quantity the
/// adaptive sampling loop compares against its noise threshold. The count
/// starts at zero and the first call always lands, so the denominator is
/// never zero.
#[derive(Debug, Default, Clone)]
pub struct RadianceSeries {
    mean: Rgb,
    count: u32,
}

impl RadianceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: Rgb) -> Scalar {
        self.count += 1;
        let contribution = (sample - self.mean) / self.count as Scalar;
        self.mean += contribution;
        contribution.length()
    }

    pub fn mean(&self) -> Rgb {
        self.mean
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_matches_arithmetic_mean() {
        let mut series = RadianceSeries::new();
        for v in [1.0, 2.0, 3.0, 6.0] {
            series.add_sample(Rgb::splat(v));
        }
        assert!((series.mean().0[0] - 3.0).abs() < 1e-6);
        assert_eq!(series.count(), 4);
    }

    #[test]
    fn contribution_shrinks_on_identical_samples() {
        let mut series = RadianceSeries::new();
        let first = series.add_sample(Rgb::splat(0.5));
        let second = series.add_sample(Rgb::splat(0.5));
        assert!(first > 0.0);
        assert_eq!(second, 0.0);
    }

    #[test]
    fn first_sample_becomes_the_mean() {
        let mut series = RadianceSeries::new();
        series.add_sample(Rgb::from_array([0.1, 0.2, 0.3]));
        assert_eq!(series.mean(), Rgb::from_array([0.1, 0.2, 0.3]));
    }
}
