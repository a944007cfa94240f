use std::sync::Arc;

use log::{debug, info, warn};
use machine_learning::{
    MlErr,
    arch::{Network, NetworkConfig},
    training::TrainingReport,
};
use ndarray::ArrayView1;
use parking_lot::RwLock;
use tokio::{sync::Mutex, task};

use super::{
    bootstrap::train_model,
    report::{LoadReport, ModelOrigin, ModelState, RetrainReport},
};
use crate::{
    EngineConfig, EngineErr, Result,
    interpreter::{Prediction, interpret},
    storage::{BlobStore, StorageErr},
    subscores::SubScores,
};

enum Slot {
    Unloaded,
    Loading,
    Training,
    Ready {
        network: Arc<Network>,
        /// Why the served model isn't persisted, if it isn't.
        persist_error: Option<Arc<EngineErr>>,
    },
}

/// What a `Ready` slot hands out.
type Served = (Arc<Network>, Option<Arc<EngineErr>>);

/// The state behind a `ModelManager`, owned by the tasks that initialize it.
struct Shared<S> {
    store: S,
    config: EngineConfig,
    slot: RwLock<Slot>,
    init: Mutex<()>,
}

/// Owns the single in-memory model and its persisted copy.
///
/// The first caller that finds no model in memory loads it from the store, or trains and
/// persists a new one if that fails. That work runs on its own task holding the init gate,
/// concurrent callers queue on the gate and pick up its result. Dropping a caller never
/// cancels the work, so a process trains at most once per `retrain`.
pub struct ModelManager<S: BlobStore> {
    shared: Arc<Shared<S>>,
}

impl<S: BlobStore + 'static> ModelManager<S> {
    /// Creates a new `ModelManager` with nothing loaded yet.
    ///
    /// # Arguments
    /// * `store` - Where the model is persisted.
    /// * `config` - The engine configuration.
    pub fn new(store: S, config: EngineConfig) -> Self {
        let shared = Shared {
            store,
            config,
            slot: RwLock::new(Slot::Unloaded),
            init: Mutex::new(()),
        };

        Self {
            shared: Arc::new(shared),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn state(&self) -> ModelState {
        match &*self.shared.slot.read() {
            Slot::Unloaded => ModelState::Unloaded,
            Slot::Loading => ModelState::Loading,
            Slot::Training => ModelState::Training,
            Slot::Ready { .. } => ModelState::Ready,
        }
    }

    /// Makes sure a model is in memory, loading or training it if needed.
    ///
    /// # Returns
    /// Where the model came from, or an error if no model could be produced at all. The
    /// report carries the persist failure for as long as the served model isn't persisted.
    pub async fn ensure_loaded(&self) -> Result<LoadReport> {
        let (_, report) = self.acquire().await?;
        Ok(report)
    }

    /// Predicts the acceptance probability of an application.
    ///
    /// The scores are validated before any model work, an invalid request never triggers a
    /// load or a training run.
    ///
    /// # Arguments
    /// * `scores` - The four raw sub-scores, each within `[0, 100]`.
    pub async fn predict(&self, scores: SubScores) -> Result<Prediction> {
        let input = scores.normalized()?;
        let (network, report) = self.acquire().await?;

        if let (Some(e), ModelOrigin::Trained(_)) = (&report.persist_error, &report.origin) {
            warn!(error:% = e; "serving a model that isn't persisted");
        }

        let probability = network.predict(ArrayView1::from(&input));
        debug!(probability = probability; "prediction served");

        Ok(interpret(probability))
    }

    /// Trains a new model, persists it and swaps it in.
    ///
    /// Callers that already hold the previous model keep using it until they're done,
    /// callers arriving during the run wait for the new one. The run completes even if
    /// this future is dropped.
    pub async fn retrain(&self) -> Result<RetrainReport> {
        let shared = Arc::clone(&self.shared);
        task::spawn(shared.retrain()).await?
    }

    async fn acquire(&self) -> Result<(Arc<Network>, LoadReport)> {
        if let Some((network, persist_error)) = self.shared.ready() {
            let report = LoadReport {
                origin: ModelOrigin::Cached,
                persist_error,
            };
            return Ok((network, report));
        }

        let shared = Arc::clone(&self.shared);
        task::spawn(shared.initialize()).await?
    }
}

impl<S: BlobStore + 'static> Shared<S> {
    async fn initialize(self: Arc<Self>) -> Result<(Arc<Network>, LoadReport)> {
        let _guard = self.init.lock().await;

        if let Some((network, persist_error)) = self.ready() {
            debug!("model was initialized by a concurrent caller");
            let report = LoadReport {
                origin: ModelOrigin::Cached,
                persist_error,
            };
            return Ok((network, report));
        }

        self.set(Slot::Loading);

        match self.load().await {
            Ok(network) => {
                info!(key:% = self.config.model_key; "model loaded from store");
                let network = Arc::new(network);
                self.set(Slot::Ready {
                    network: Arc::clone(&network),
                    persist_error: None,
                });
                Ok((network, LoadReport::new(ModelOrigin::Loaded)))
            }
            Err(e) => {
                match &e {
                    EngineErr::Storage(StorageErr::NotFound { .. }) => {
                        info!(key:% = self.config.model_key; "no persisted model, training a new one")
                    }
                    _ => warn!(error:% = e; "persisted model is unusable, training a new one"),
                }

                let (network, stats, persist_error) = self.train_and_persist().await?;
                let report = LoadReport {
                    origin: ModelOrigin::Trained(stats),
                    persist_error,
                };

                Ok((network, report))
            }
        }
    }

    async fn retrain(self: Arc<Self>) -> Result<RetrainReport> {
        let _guard = self.init.lock().await;
        info!(key:% = self.config.model_key; "retraining model");

        let (_, stats, persist_error) = self.train_and_persist().await?;
        Ok(RetrainReport {
            stats,
            persist_error,
        })
    }

    async fn load(self: &Arc<Self>) -> Result<Network> {
        let shared = Arc::clone(self);
        let bytes =
            task::spawn_blocking(move || shared.store.read(&shared.config.model_key)).await??;
        let network = Network::from_bytes(&bytes)?;

        let expected = NetworkConfig::default();
        if network.config() != &expected {
            return Err(EngineErr::Model(MlErr::Corrupt(format!(
                "persisted config {:?} doesn't match {expected:?}",
                network.config()
            ))));
        }

        Ok(network)
    }

    /// Must be called with the init gate held.
    async fn train_and_persist(
        self: &Arc<Self>,
    ) -> Result<(Arc<Network>, TrainingReport, Option<Arc<EngineErr>>)> {
        self.set(Slot::Training);

        let shared = Arc::clone(self);
        let trained = task::spawn_blocking(move || train_model(&shared.config))
            .await
            .map_err(EngineErr::from)
            .and_then(|result| result);

        let (network, stats) = match trained {
            Ok(trained) => trained,
            Err(e) => {
                self.set(Slot::Unloaded);
                return Err(e);
            }
        };

        let network = Arc::new(network);
        let persist_error = self.persist(&network).await.err().map(Arc::new);

        if let Some(e) = &persist_error {
            warn!(error:% = e; "keeping the trained model in memory only");
        }

        self.set(Slot::Ready {
            network: Arc::clone(&network),
            persist_error: persist_error.clone(),
        });
        Ok((network, stats, persist_error))
    }

    async fn persist(self: &Arc<Self>, network: &Network) -> Result<()> {
        let bytes = network.to_bytes()?;
        let shared = Arc::clone(self);

        task::spawn_blocking(move || shared.store.write(&shared.config.model_key, &bytes))
            .await?
            .map_err(|source| EngineErr::Persist {
                key: self.config.model_key.clone(),
                source,
            })?;

        info!(key:% = self.config.model_key; "model persisted");
        Ok(())
    }

    fn ready(&self) -> Option<Served> {
        match &*self.slot.read() {
            Slot::Ready {
                network,
                persist_error,
            } => Some((Arc::clone(network), persist_error.clone())),
            _ => None,
        }
    }

    fn set(&self, slot: Slot) {
        *self.slot.write() = slot;
    }
}
