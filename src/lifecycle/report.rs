use std::sync::Arc;

use machine_learning::training::TrainingReport;
use serde::Serialize;

use crate::EngineErr;

/// The observable state of the model slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Unloaded,
    Loading,
    Training,
    Ready,
}

/// Where the model serving a call came from.
#[derive(Debug)]
pub enum ModelOrigin {
    /// It was already in memory.
    Cached,
    /// It was read from the blob store.
    Loaded,
    /// It was trained because no usable persisted model existed.
    Trained(TrainingReport),
}

/// The outcome of `ModelManager::ensure_loaded`.
#[derive(Debug)]
pub struct LoadReport {
    pub origin: ModelOrigin,
    /// Set while the served model couldn't be persisted, the model is still served.
    pub persist_error: Option<Arc<EngineErr>>,
}

impl LoadReport {
    pub(super) fn new(origin: ModelOrigin) -> Self {
        Self {
            origin,
            persist_error: None,
        }
    }
}

/// The outcome of `ModelManager::retrain`.
#[derive(Debug)]
pub struct RetrainReport {
    pub stats: TrainingReport,
    /// Set when the new model couldn't be persisted, the model is still served.
    pub persist_error: Option<Arc<EngineErr>>,
}
