use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, linalg};
use rand::Rng;

use super::{NetworkConfig, activations::Sigmoid};
use crate::{
    MlErr, Result,
    dataset::Dataset,
    initialization::{ParamGen, RandParamGen},
    persistence::PersistedModel,
};

/// Biases start uniformly within `[-BIAS_RANGE, BIAS_RANGE)`.
const BIAS_RANGE: f32 = 0.05;

/// The trainable parameters of a `Network`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightState {
    input_hidden: Array2<f32>,
    hidden_output: Array2<f32>,
    hidden_bias: Array1<f32>,
    output_bias: Array1<f32>,
}

impl WeightState {
    /// Creates a new `WeightState`, its shape is checked once it is bound to a config.
    ///
    /// # Arguments
    /// * `input_hidden` - An `input_size x hidden_size` matrix.
    /// * `hidden_output` - A `hidden_size x output_size` matrix.
    /// * `hidden_bias` - The `hidden_size` biases of the hidden layer.
    /// * `output_bias` - The `output_size` biases of the output layer.
    pub fn new(
        input_hidden: Array2<f32>,
        hidden_output: Array2<f32>,
        hidden_bias: Array1<f32>,
        output_bias: Array1<f32>,
    ) -> Self {
        Self {
            input_hidden,
            hidden_output,
            hidden_bias,
            output_bias,
        }
    }

    pub fn input_hidden(&self) -> ArrayView2<'_, f32> {
        self.input_hidden.view()
    }

    pub fn hidden_output(&self) -> ArrayView2<'_, f32> {
        self.hidden_output.view()
    }

    pub fn hidden_bias(&self) -> ArrayView1<'_, f32> {
        self.hidden_bias.view()
    }

    pub fn output_bias(&self) -> ArrayView1<'_, f32> {
        self.output_bias.view()
    }

    /// Returns whether every parameter is a finite number.
    pub fn is_finite(&self) -> bool {
        self.input_hidden.iter().all(|w| w.is_finite())
            && self.hidden_output.iter().all(|w| w.is_finite())
            && self.hidden_bias.iter().all(|b| b.is_finite())
            && self.output_bias.iter().all(|b| b.is_finite())
    }

    /// Checks the dimensions against `config` and that there are no NaN/Inf values.
    fn check(&self, config: &NetworkConfig) -> Result<()> {
        let (i, h, o) = (
            config.input_size(),
            config.hidden_size(),
            config.output_size(),
        );

        check_dim("input_hidden rows", self.input_hidden.nrows(), i)?;
        check_dim("input_hidden cols", self.input_hidden.ncols(), h)?;
        check_dim("hidden_output rows", self.hidden_output.nrows(), h)?;
        check_dim("hidden_output cols", self.hidden_output.ncols(), o)?;
        check_dim("hidden_bias", self.hidden_bias.len(), h)?;
        check_dim("output_bias", self.output_bias.len(), o)?;

        if !self.is_finite() {
            return Err(MlErr::NonFinite { what: "weights" });
        }

        Ok(())
    }
}

fn check_dim(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(MlErr::SizeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

/// The activations produced by a single forward pass, kept for the backward pass.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    hidden: Array1<f32>,
    output: Array1<f32>,
}

impl ForwardPass {
    pub fn hidden(&self) -> ArrayView1<'_, f32> {
        self.hidden.view()
    }

    pub fn output(&self) -> ArrayView1<'_, f32> {
        self.output.view()
    }

    /// The first output unit, the acceptance probability.
    pub fn probability(&self) -> f32 {
        self.output[0]
    }
}

/// A feed-forward network with a single sigmoid hidden layer and a sigmoid output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    config: NetworkConfig,
    weights: WeightState,
}

impl Network {
    /// Creates a new randomly initialized `Network`.
    ///
    /// Each weight matrix is drawn uniformly within `±1/sqrt(fan_in)` so the first passes
    /// don't saturate the sigmoid, biases are drawn from a small range around zero.
    ///
    /// # Arguments
    /// * `config` - The topology of the network.
    /// * `rng` - A random number generator.
    pub fn init<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let (i, h, o) = (
            config.input_size(),
            config.hidden_size(),
            config.output_size(),
        );

        let w1 = RandParamGen::scaled_uniform(i * h, i)?.fill(rng, i * h, "input_hidden")?;
        let w2 = RandParamGen::scaled_uniform(h * o, h)?.fill(rng, h * o, "hidden_output")?;

        let mut biases = RandParamGen::uniform(h + o, -BIAS_RANGE, BIAS_RANGE)?;
        let b1 = biases.fill(rng, h, "hidden_bias")?;
        let b2 = biases.fill(rng, o, "output_bias")?;

        let weights = WeightState {
            input_hidden: Array2::from_shape_vec((i, h), w1).map_err(shape_err)?,
            hidden_output: Array2::from_shape_vec((h, o), w2).map_err(shape_err)?,
            hidden_bias: Array1::from_vec(b1),
            output_bias: Array1::from_vec(b2),
        };

        Self::from_weights(config, weights)
    }

    /// Binds an existing `WeightState` to a config.
    ///
    /// # Returns
    /// An error if the config is invalid, the dimensions don't match it or a value is not finite.
    pub fn from_weights(config: NetworkConfig, weights: WeightState) -> Result<Self> {
        config.validate()?;
        weights.check(&config)?;
        Ok(Self { config, weights })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn weights(&self) -> &WeightState {
        &self.weights
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - A normalized input of `input_size` values.
    ///
    /// # Returns
    /// The hidden and output activations.
    ///
    /// # Panics
    /// If `x.len()` is not the configured input size.
    pub fn forward(&self, x: ArrayView1<f32>) -> ForwardPass {
        let WeightState {
            input_hidden,
            hidden_output,
            hidden_bias,
            output_bias,
        } = &self.weights;

        let hidden = (x.dot(input_hidden) + hidden_bias).mapv_into(|z| Sigmoid.f(z));
        let output = (hidden.dot(hidden_output) + output_bias).mapv_into(|z| Sigmoid.f(z));

        ForwardPass { hidden, output }
    }

    /// Makes a single stochastic update from one example.
    ///
    /// The error is `target - output`, so the scaled deltas are *added* to the parameters.
    ///
    /// # Arguments
    /// * `x` - The input the pass was computed from.
    /// * `target` - The expected output.
    /// * `pass` - The result of `forward(x)` with the current parameters.
    ///
    /// # Returns
    /// The mean absolute error of the pass over the output units.
    pub fn backward(&mut self, x: ArrayView1<f32>, target: ArrayView1<f32>, pass: &ForwardPass) -> f32 {
        let lr = self.config.learning_rate();
        let error = &target - &pass.output;

        let mut output_delta = error.clone();
        output_delta.zip_mut_with(&pass.output, |d, &a| *d *= Sigmoid.df(a));

        // Must be computed with the output weights prior to this update.
        let mut hidden_delta = self.weights.hidden_output.dot(&output_delta);
        hidden_delta.zip_mut_with(&pass.hidden, |d, &h| *d *= Sigmoid.df(h));

        let WeightState {
            input_hidden,
            hidden_output,
            hidden_bias,
            output_bias,
        } = &mut self.weights;

        linalg::general_mat_mul(
            lr,
            &pass.hidden.view().insert_axis(Axis(1)),
            &output_delta.view().insert_axis(Axis(0)),
            1.0,
            hidden_output,
        );
        output_bias.scaled_add(lr, &output_delta);

        linalg::general_mat_mul(
            lr,
            &x.insert_axis(Axis(1)),
            &hidden_delta.view().insert_axis(Axis(0)),
            1.0,
            input_hidden,
        );
        hidden_bias.scaled_add(lr, &hidden_delta);

        error.mapv(f32::abs).mean().unwrap_or_default()
    }

    /// Returns the acceptance probability for a normalized input.
    pub fn predict(&self, x: ArrayView1<f32>) -> f32 {
        self.forward(x).probability()
    }

    /// Computes the mean absolute error over a dataset without touching the parameters.
    pub fn evaluate(&self, dataset: &Dataset) -> f32 {
        if dataset.is_empty() {
            return 0.0;
        }

        let total: f32 = dataset
            .iter()
            .map(|example| {
                let pass = self.forward(example.input());
                (&example.target() - &pass.output)
                    .mapv(f32::abs)
                    .mean()
                    .unwrap_or_default()
            })
            .sum();

        total / dataset.len() as f32
    }

    /// Serializes the config and parameters into a versioned artifact.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PersistedModel::from_network(self).encode()
    }

    /// Rebuilds a network from `to_bytes` output.
    ///
    /// # Returns
    /// `MlErr::Corrupt` if the artifact is malformed or structurally inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        PersistedModel::decode(bytes)?.into_network()
    }
}

fn shape_err(_: ndarray::ShapeError) -> MlErr {
    MlErr::InvalidConfig("parameter buffer doesn't fit the layer shape")
}
