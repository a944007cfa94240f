use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    arch::{Network, NetworkConfig, WeightState},
};

/// Version written by `PersistedModel::encode`, anything else is rejected on decode.
pub const SCHEMA_VERSION: u32 = 1;

/// The stored parameters, row-major so each row can be checked against the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub input_hidden: Vec<Vec<f32>>,
    pub hidden_output: Vec<Vec<f32>>,
    pub hidden_bias: Vec<f32>,
    pub output_bias: Vec<f32>,
}

/// The on-disk form of a trained `Network`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistedModel {
    pub version: u32,
    pub config: NetworkConfig,
    pub weights: WeightRecord,
}

impl PersistedModel {
    /// Captures the config and parameters of `network`.
    pub fn from_network(network: &Network) -> Self {
        let weights = network.weights();

        Self {
            version: SCHEMA_VERSION,
            config: *network.config(),
            weights: WeightRecord {
                input_hidden: rows(weights.input_hidden()),
                hidden_output: rows(weights.hidden_output()),
                hidden_bias: weights.hidden_bias().to_vec(),
                output_bias: weights.output_bias().to_vec(),
            },
        }
    }

    /// Serializes the artifact as JSON.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(MlErr::Encode)
    }

    /// Parses an artifact, only its syntax is checked here.
    ///
    /// # Returns
    /// `MlErr::Corrupt` if the bytes are not a well formed artifact.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| MlErr::Corrupt(e.to_string()))
    }

    /// Rebuilds the network after validating the artifact's structure.
    ///
    /// # Returns
    /// `MlErr::Corrupt` on an unknown version, an invalid config, a dimension that doesn't
    /// match the config or a non finite value. Nothing is ever reshaped or defaulted.
    pub fn into_network(self) -> Result<Network> {
        if self.version != SCHEMA_VERSION {
            return Err(MlErr::Corrupt(format!(
                "unsupported schema version {}, expected {SCHEMA_VERSION}",
                self.version
            )));
        }

        let config = self.config;
        config.validate().map_err(corrupt)?;

        let (i, h, o) = (
            config.input_size(),
            config.hidden_size(),
            config.output_size(),
        );

        let WeightRecord {
            input_hidden,
            hidden_output,
            hidden_bias,
            output_bias,
        } = self.weights;

        let weights = WeightState::new(
            matrix("input_hidden", input_hidden, i, h)?,
            matrix("hidden_output", hidden_output, h, o)?,
            Array1::from_vec(hidden_bias),
            Array1::from_vec(output_bias),
        );

        Network::from_weights(config, weights).map_err(corrupt)
    }
}

fn rows(matrix: ArrayView2<f32>) -> Vec<Vec<f32>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn matrix(what: &str, rows: Vec<Vec<f32>>, nrows: usize, ncols: usize) -> Result<Array2<f32>> {
    if rows.len() != nrows {
        return Err(MlErr::Corrupt(format!(
            "{what} has {} rows, expected {nrows}",
            rows.len()
        )));
    }

    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(MlErr::Corrupt(format!(
            "{what} row {idx} has {} columns, expected {ncols}",
            row.len()
        )));
    }

    let flat = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(|e| MlErr::Corrupt(e.to_string()))
}

fn corrupt(e: MlErr) -> MlErr {
    match e {
        MlErr::Corrupt(_) => e,
        other => MlErr::Corrupt(other.to_string()),
    }
}
