use log::info;
use machine_learning::{
    arch::{Network, NetworkConfig},
    training::{Trainer, TrainingReport},
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{EngineConfig, Result, synthesis::Synthesizer};

/// Synthesizes a training set and trains a freshly initialized network on it.
///
/// This is CPU bound for the whole epoch schedule, async callers must run it on the
/// blocking pool.
///
/// # Arguments
/// * `config` - Sizes the run and seeds its random source.
///
/// # Returns
/// The trained network and the statistics of the run.
pub fn train_model(config: &EngineConfig) -> Result<(Network, TrainingReport)> {
    let mut rng = generate_rng(config.seed);

    let mut dataset = Synthesizer::new(&mut rng).dataset(config.training_examples.get())?;
    let mut network = Network::init(NetworkConfig::default(), &mut rng)?;

    info!(
        examples = dataset.len(),
        epochs = config.epochs.get(),
        seeded = config.seed.is_some();
        "training acceptance model"
    );

    let mut trainer = Trainer::new(config.epochs, config.log_every, &mut rng);
    let report = trainer.train(&mut network, &mut dataset);

    info!(
        final_error = report.final_error(),
        elapsed_ms = report.elapsed().as_millis() as u64;
        "training finished"
    );

    Ok((network, report))
}

fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
