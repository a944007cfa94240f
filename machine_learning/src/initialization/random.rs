use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::ParamGen;
use crate::{MlErr, Result};

/// A parameter generator that follows a certain probabilistic distribution.
pub struct RandParamGen<D: Distribution<f32>> {
    distribution: D,
    remaining: usize,
}

impl<D: Distribution<f32>> RandParamGen<D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(distribution: D, limit: usize) -> Self {
        Self {
            distribution,
            remaining: limit,
        }
    }
}

impl RandParamGen<Uniform<f32>> {
    /// Creates a new `RandParamGen` parameter generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high or not finite).
    pub fn uniform(limit: usize, low: f32, high: f32) -> Result<Self> {
        let distribution = Uniform::new(low, high)
            .map_err(|_| MlErr::InvalidConfig("invalid uniform range"))?;

        Ok(Self::new(distribution, limit))
    }

    /// Creates a new `RandParamGen` uniform over `[-1/sqrt(fan_in), 1/sqrt(fan_in))`.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units feeding the weight matrix.
    ///
    /// # Returns
    /// An error if `fan_in` is zero.
    pub fn scaled_uniform(limit: usize, fan_in: usize) -> Result<Self> {
        if fan_in == 0 {
            return Err(MlErr::InvalidConfig("fan in must be greater than zero"));
        }

        let range = 1. / (fan_in as f32).sqrt();
        Self::uniform(limit, -range, range)
    }
}

impl<D: Distribution<f32>> ParamGen for RandParamGen<D> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let sample = (0..n).map(|_| self.distribution.sample(rng)).collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn exact() {
        const SIZE: usize = 10;
        let mut rng = StdRng::seed_from_u64(42);

        let mut param_gen = RandParamGen::uniform(SIZE, -1., 1.).unwrap();
        let sample = param_gen.sample(&mut rng, SIZE).unwrap();

        assert_eq!(sample.len(), SIZE);
        assert!(param_gen.sample(&mut rng, 1).is_none());
    }

    #[test]
    fn scaled_uniform_respects_fan_in() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut param_gen = RandParamGen::scaled_uniform(1000, 4).unwrap();
        let sample = param_gen.sample(&mut rng, 1000).unwrap();

        assert!(sample.iter().all(|w| (-0.5..0.5).contains(w)));
        assert!(sample.iter().any(|w| *w < 0.) && sample.iter().any(|w| *w > 0.));
    }

    #[test]
    fn invalid_ranges() {
        assert!(RandParamGen::uniform(1, 1., 1.).is_err());
        assert!(RandParamGen::scaled_uniform(1, 0).is_err());
    }
}
