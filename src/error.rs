use std::{
    error::Error,
    fmt::{self, Display},
};

use machine_learning::MlErr;
use tokio::task::JoinError;

use crate::storage::StorageErr;

/// The engine's result type.
pub type Result<T> = std::result::Result<T, EngineErr>;

/// All errors that can occur in the acceptance engine.
#[derive(Debug)]
pub enum EngineErr {
    /// A sub-score is missing its 0-100 range or is not a number.
    InvalidSubScore { name: &'static str, value: f32 },
    InvalidConfig(String),
    Model(MlErr),
    Storage(StorageErr),
    /// A trained model couldn't be saved; it is still being served from memory.
    Persist { key: String, source: StorageErr },
    /// The blocking training task panicked or was cancelled.
    Task(JoinError),
}

impl Display for EngineErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSubScore { name, value } => {
                write!(f, "{name} sub-score must be within [0, 100], got {value}")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Model(e) => write!(f, "model error: {e}"),
            Self::Storage(e) => write!(f, "storage error: {e}"),
            Self::Persist { key, source } => {
                write!(f, "failed to persist model under {key:?}: {source}")
            }
            Self::Task(e) => write!(f, "training task failed: {e}"),
        }
    }
}

impl Error for EngineErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Persist { source, .. } => Some(source),
            Self::Task(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for EngineErr {
    fn from(value: MlErr) -> Self {
        Self::Model(value)
    }
}

impl From<StorageErr> for EngineErr {
    fn from(value: StorageErr) -> Self {
        Self::Storage(value)
    }
}

impl From<JoinError> for EngineErr {
    fn from(value: JoinError) -> Self {
        Self::Task(value)
    }
}
