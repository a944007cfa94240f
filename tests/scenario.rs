use std::num::NonZeroUsize;

use acceptance_engine::{
    EngineConfig, ModelManager, Recommendation, SubScores, storage::MemoryStore,
};

fn config(examples: usize, epochs: usize) -> EngineConfig {
    EngineConfig {
        training_examples: NonZeroUsize::new(examples).unwrap(),
        epochs: NonZeroUsize::new(epochs).unwrap(),
        log_every: NonZeroUsize::new(100).unwrap(),
        seed: Some(42),
        ..EngineConfig::default()
    }
}

async fn check_scenario(manager: &ModelManager<MemoryStore>) {
    let strong = manager
        .predict(SubScores::new(95., 80., 70., 50.))
        .await
        .unwrap();
    let weak = manager
        .predict(SubScores::new(10., 10., 10., 10.))
        .await
        .unwrap();

    assert!(strong.probability_percent >= 60, "{strong:?}");
    assert!(weak.probability_percent < 30, "{weak:?}");
    assert_eq!(weak.recommendation, Recommendation::FocusElsewhere);
    assert!(strong.raw_probability > weak.raw_probability);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn short_schedule_separates_strong_and_weak_profiles() {
    let manager = ModelManager::new(MemoryStore::new(), config(500, 800));
    check_scenario(&manager).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "runs the full default training schedule"]
async fn default_schedule_separates_strong_and_weak_profiles() {
    let defaults = EngineConfig::default();
    let manager = ModelManager::new(
        MemoryStore::new(),
        EngineConfig {
            seed: Some(42),
            ..defaults
        },
    );
    check_scenario(&manager).await;
}
