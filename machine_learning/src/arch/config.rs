use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

/// Amount of match sub-scores fed to the network.
pub const INPUT_SIZE: usize = 4;

/// Amount of hidden units.
pub const HIDDEN_SIZE: usize = 8;

/// Amount of output units, the acceptance probability.
pub const OUTPUT_SIZE: usize = 1;

/// Step length of every stochastic update.
pub const LEARNING_RATE: f32 = 0.01;

/// The topology and learning rate of a one-hidden-layer network.
///
/// Every dimension in the crate is derived from here, never from array lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    learning_rate: f32,
}

impl NetworkConfig {
    /// Creates a new `NetworkConfig`.
    ///
    /// # Arguments
    /// * `input_size` - The amount of inputs.
    /// * `hidden_size` - The amount of hidden units.
    /// * `output_size` - The amount of outputs.
    /// * `learning_rate` - The step length used by `Network::backward`.
    ///
    /// # Returns
    /// An error if any size is zero or the learning rate is not in (0, 1].
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f32,
    ) -> Result<Self> {
        let config = Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants of this config.
    ///
    /// Deserialized configs skip `new`, so decoders have to call this themselves.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(MlErr::InvalidConfig("layer sizes must be greater than zero"));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(MlErr::InvalidConfig("learning rate must be within (0, 1]"));
        }

        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Default for NetworkConfig {
    /// The acceptance network: 4 inputs, 8 hidden units, 1 output and a 0.01 learning rate.
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            hidden_size: HIDDEN_SIZE,
            output_size: OUTPUT_SIZE,
            learning_rate: LEARNING_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = NetworkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            (config.input_size(), config.hidden_size(), config.output_size()),
            (4, 8, 1)
        );
        assert_eq!(config.learning_rate(), 0.01);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(NetworkConfig::new(0, 8, 1, 0.01).is_err());
        assert!(NetworkConfig::new(4, 0, 1, 0.01).is_err());
        assert!(NetworkConfig::new(4, 8, 0, 0.01).is_err());
    }

    #[test]
    fn learning_rate_bounds() {
        assert!(NetworkConfig::new(4, 8, 1, 0.0).is_err());
        assert!(NetworkConfig::new(4, 8, 1, 1.5).is_err());
        assert!(NetworkConfig::new(4, 8, 1, f32::NAN).is_err());
        assert!(NetworkConfig::new(4, 8, 1, 1.0).is_ok());
    }
}
