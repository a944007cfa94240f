use std::{env, num::NonZeroUsize, path::PathBuf, str::FromStr};

use machine_learning::training::{DEFAULT_EPOCHS, DEFAULT_LOG_EVERY};

use crate::{EngineErr, Result};

/// Examples synthesized for a training run by default.
pub const DEFAULT_TRAINING_EXAMPLES: usize = 1_000;

pub const DEFAULT_MODEL_KEY: &str = "acceptance-model";
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Immutable runtime configuration of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub model_key: String,
    pub model_dir: PathBuf,
    pub training_examples: NonZeroUsize,
    pub epochs: NonZeroUsize,
    pub log_every: NonZeroUsize,
    /// Seeds every random source of a training run, `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_key: DEFAULT_MODEL_KEY.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            training_examples: non_zero(DEFAULT_TRAINING_EXAMPLES),
            epochs: non_zero(DEFAULT_EPOCHS),
            log_every: non_zero(DEFAULT_LOG_EVERY),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from the `ACCEPTANCE_*` environment variables, falling back
    /// to the defaults for the unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Arguments
    /// * `lookup` - Maps a variable name to its value, if set.
    ///
    /// # Returns
    /// `EngineErr::InvalidConfig` if a set variable can't be parsed.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("ACCEPTANCE_MODEL_KEY") {
            config.model_key = key;
        }
        if let Some(dir) = lookup("ACCEPTANCE_MODEL_DIR") {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(n) = parse(&lookup, "ACCEPTANCE_TRAINING_EXAMPLES")? {
            config.training_examples = n;
        }
        if let Some(n) = parse(&lookup, "ACCEPTANCE_EPOCHS")? {
            config.epochs = n;
        }
        if let Some(n) = parse(&lookup, "ACCEPTANCE_LOG_EVERY")? {
            config.log_every = n;
        }
        config.seed = parse(&lookup, "ACCEPTANCE_SEED")?;

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| EngineErr::InvalidConfig(format!("{name}={raw:?}: {e}")))
        })
        .transpose()
}

fn non_zero(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN)
}
