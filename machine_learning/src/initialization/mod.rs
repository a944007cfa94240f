//! Sources for the initial values of a network's parameters.

mod random;

use rand::Rng;

use crate::{MlErr, Result};

pub use random::RandParamGen;

/// Yields the initial values of a parameter tensor, possibly drawing from a random source.
pub trait ParamGen {
    /// Samples up to `n` values.
    ///
    /// # Returns
    /// `None` once the generator is exhausted, fewer than `n` values if it runs out midway.
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize) -> Option<Vec<f32>>;

    /// Samples exactly `n` values for the tensor named `what`.
    ///
    /// # Returns
    /// `MlErr::SizeMismatch` if the generator can't provide all of them.
    fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R, n: usize, what: &'static str) -> Result<Vec<f32>> {
        let values = self.sample(rng, n).unwrap_or_default();

        if values.len() != n {
            return Err(MlErr::SizeMismatch {
                what,
                got: values.len(),
                expected: n,
            });
        }

        Ok(values)
    }
}
