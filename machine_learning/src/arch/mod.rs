pub mod activations;
mod config;
mod network;

pub use config::{HIDDEN_SIZE, INPUT_SIZE, LEARNING_RATE, NetworkConfig, OUTPUT_SIZE};
pub use network::{ForwardPass, Network, WeightState};
