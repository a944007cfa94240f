use std::{
    io,
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use acceptance_engine::{
    EngineConfig, EngineErr, ModelManager, ModelOrigin, ModelState, SubScores,
    storage::{BlobStore, FileStore, MemoryStore, StorageErr},
};
use machine_learning::arch::Network;

/// Counts the calls that reach the wrapped store.
#[derive(Default, Clone)]
struct Counters {
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    counters: Counters,
}

impl BlobStore for CountingStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageErr> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(key)
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<(), StorageErr> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(key, blob)
    }
}

/// Accepts reads but fails every write.
struct ReadOnlyStore;

impl BlobStore for ReadOnlyStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageErr> {
        Err(StorageErr::NotFound {
            key: key.to_string(),
        })
    }

    fn write(&self, _key: &str, _blob: &[u8]) -> Result<(), StorageErr> {
        Err(StorageErr::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "read-only store",
        )))
    }
}

fn small_config() -> EngineConfig {
    EngineConfig {
        training_examples: NonZeroUsize::new(60).unwrap(),
        epochs: NonZeroUsize::new(5).unwrap(),
        seed: Some(21),
        ..EngineConfig::default()
    }
}

fn scores() -> SubScores {
    SubScores::new(95., 80., 70., 50.)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_predictions_train_once() {
    let manager = Arc::new(ModelManager::new(CountingStore::default(), small_config()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.predict(scores()).await })
        })
        .collect();

    let mut predictions = Vec::new();
    for handle in handles {
        predictions.push(handle.await.unwrap().unwrap());
    }

    assert!(predictions.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(manager.state(), ModelState::Ready);

    let report = manager.ensure_loaded().await.unwrap();
    assert!(matches!(report.origin, ModelOrigin::Cached));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_loads_hit_the_store_once() {
    let store = CountingStore::default();
    let counters = store.counters.clone();
    let manager = Arc::new(ModelManager::new(store, small_config()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.ensure_loaded().await })
        })
        .collect();

    let mut trained = 0;
    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        if let ModelOrigin::Trained(_) = report.origin {
            trained += 1;
        }
    }

    assert_eq!(trained, 1);
    assert_eq!(counters.reads.load(Ordering::SeqCst), 1);
    assert_eq!(counters.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_first_caller_does_not_restart_training() {
    let store = CountingStore::default();
    let counters = store.counters.clone();
    let config = EngineConfig {
        training_examples: NonZeroUsize::new(200).unwrap(),
        epochs: NonZeroUsize::new(300).unwrap(),
        ..small_config()
    };
    let manager = Arc::new(ModelManager::new(store, config));

    let first = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.ensure_loaded().await })
    };

    let started = tokio::time::timeout(Duration::from_secs(60), async {
        while !matches!(manager.state(), ModelState::Training | ModelState::Ready) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;
    assert!(started.is_ok(), "training never started");

    first.abort();
    let _ = first.await;

    let report = manager.ensure_loaded().await.unwrap();

    assert!(matches!(report.origin, ModelOrigin::Cached));
    assert_eq!(manager.state(), ModelState::Ready);
    assert_eq!(counters.reads.load(Ordering::SeqCst), 1);
    assert_eq!(counters.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn waiters_see_the_persist_failure() {
    let manager = Arc::new(ModelManager::new(ReadOnlyStore, small_config()));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.ensure_loaded().await })
        })
        .collect();

    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        assert!(matches!(
            report.persist_error.as_deref(),
            Some(EngineErr::Persist { .. })
        ));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn existing_model_is_loaded_without_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        model_dir: dir.path().to_path_buf(),
        ..small_config()
    };

    let first = ModelManager::new(FileStore::new(dir.path()), config.clone());
    let trained = first.predict(scores()).await.unwrap();

    let second = ModelManager::new(FileStore::new(dir.path()), config);
    let report = second.ensure_loaded().await.unwrap();
    let loaded = second.predict(scores()).await.unwrap();

    assert!(matches!(report.origin, ModelOrigin::Loaded));
    assert_eq!(trained.raw_probability.to_bits(), loaded.raw_probability.to_bits());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn corrupt_model_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let config = small_config();
    store.write(&config.model_key, b"{\"version\": 1, \"weights\": null}").unwrap();

    let manager = ModelManager::new(store, config.clone());
    let report = manager.ensure_loaded().await.unwrap();

    assert!(matches!(report.origin, ModelOrigin::Trained(_)));

    let bytes = FileStore::new(dir.path()).read(&config.model_key).unwrap();
    assert!(Network::from_bytes(&bytes).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn persist_failure_still_serves() {
    let manager = ModelManager::new(ReadOnlyStore, small_config());

    let report = manager.ensure_loaded().await.unwrap();
    assert!(matches!(
        report.persist_error.as_deref(),
        Some(EngineErr::Persist {
            source: StorageErr::Io(_),
            ..
        })
    ));
    assert_eq!(manager.state(), ModelState::Ready);

    let prediction = manager.predict(scores()).await.unwrap();
    assert!(prediction.probability_percent <= 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn retrain_overwrites_persisted_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        seed: None,
        ..small_config()
    };

    let manager = ModelManager::new(FileStore::new(dir.path()), config.clone());
    manager.ensure_loaded().await.unwrap();
    let before = FileStore::new(dir.path()).read(&config.model_key).unwrap();

    let report = manager.retrain().await.unwrap();
    let after = FileStore::new(dir.path()).read(&config.model_key).unwrap();

    assert!(report.persist_error.is_none());
    assert_eq!(report.stats.epochs(), 5);
    assert_ne!(before, after);
    assert_eq!(manager.state(), ModelState::Ready);
}

#[tokio::test]
async fn invalid_request_is_rejected() {
    let manager = ModelManager::new(MemoryStore::new(), small_config());

    for bad in [
        SubScores::new(-1., 50., 50., 50.),
        SubScores::new(50., 50., f32::NAN, 50.),
        SubScores::new(50., 50., 50., 100.5),
    ] {
        assert!(matches!(
            manager.predict(bad).await,
            Err(EngineErr::InvalidSubScore { .. })
        ));
    }

    assert_eq!(manager.state(), ModelState::Unloaded);
}
