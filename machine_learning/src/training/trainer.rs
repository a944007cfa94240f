use std::{num::NonZeroUsize, time::Instant};

use log::{debug, info};
use rand::Rng;

use super::TrainingReport;
use crate::{arch::Network, dataset::Dataset};

/// Epochs run by default.
pub const DEFAULT_EPOCHS: usize = 10_000;

/// Progress is logged once every this many epochs by default.
pub const DEFAULT_LOG_EVERY: usize = 1_000;

/// Runs plain per-example stochastic training over a fixed epoch schedule.
///
/// There is no early stopping, every call runs all of its epochs.
pub struct Trainer<R: Rng> {
    epochs: NonZeroUsize,
    log_every: NonZeroUsize,
    rng: R,
}

impl<R: Rng> Trainer<R> {
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `epochs` - The amount of full passes over the dataset.
    /// * `log_every` - How many epochs between progress logs.
    /// * `rng` - A random number generator used to shuffle the dataset each epoch.
    pub fn new(epochs: NonZeroUsize, log_every: NonZeroUsize, rng: R) -> Self {
        Self {
            epochs,
            log_every,
            rng,
        }
    }

    /// Trains `network` on `dataset`.
    ///
    /// Each epoch shuffles the dataset and then applies one `Network::backward` step per
    /// example, sequentially.
    ///
    /// # Arguments
    /// * `network` - The network whose parameters get updated.
    /// * `dataset` - The examples to train on.
    ///
    /// # Returns
    /// The statistics of the run.
    pub fn train(&mut self, network: &mut Network, dataset: &mut Dataset) -> TrainingReport {
        let start = Instant::now();
        let epochs = self.epochs.get();
        let mut losses = Vec::with_capacity(epochs);

        debug!(examples = dataset.len(), epochs = epochs; "training started");

        for epoch in 0..epochs {
            dataset.shuffle(&mut self.rng);

            let total: f32 = dataset
                .iter()
                .map(|example| {
                    let x = example.input();
                    let pass = network.forward(x);
                    network.backward(x, example.target(), &pass)
                })
                .sum();

            let loss = total / dataset.len().max(1) as f32;
            losses.push(loss);

            if epoch % self.log_every.get() == 0 {
                info!(epoch = epoch, error = loss; "training progress");
            }
        }

        TrainingReport::new(dataset.len(), losses, start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{arch::NetworkConfig, dataset::TrainingExample};

    fn linear_dataset(rng: &mut StdRng, n: usize) -> Dataset {
        let examples = (0..n)
            .map(|_| {
                let x: Vec<f32> = (0..4).map(|_| rng.random_range(0.0..=1.0)).collect();
                let y = 0.1 + 0.5 * (x.iter().sum::<f32>() / 4.);
                TrainingExample::new(x, vec![y])
            })
            .collect();

        Dataset::new(examples, 4, 1).unwrap()
    }

    #[test]
    fn runs_the_full_schedule() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut network = Network::init(NetworkConfig::default(), &mut rng).unwrap();
        let mut dataset = linear_dataset(&mut rng, 20);

        let epochs = NonZeroUsize::new(15).unwrap();
        let mut trainer = Trainer::new(epochs, NonZeroUsize::new(5).unwrap(), rng);
        let report = trainer.train(&mut network, &mut dataset);

        assert_eq!(report.epochs(), 15);
        assert_eq!(report.examples(), 20);
        assert_eq!(report.losses().len(), 15);
        assert_eq!(report.final_error(), report.losses()[14]);
    }

    #[test]
    fn training_reduces_held_out_error() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::init(NetworkConfig::default(), &mut rng).unwrap();
        let mut dataset = linear_dataset(&mut rng, 200);
        let validation = linear_dataset(&mut rng, 50);

        let before = network.evaluate(&validation);

        let epochs = NonZeroUsize::new(300).unwrap();
        let mut trainer = Trainer::new(epochs, NonZeroUsize::new(100).unwrap(), rng);
        trainer.train(&mut network, &mut dataset);

        let after = network.evaluate(&validation);
        assert!(after < before, "error went from {before} to {after}");
        assert!(network.weights().is_finite());
        assert_eq!(network.weights().input_hidden().dim(), (4, 8));
        assert_eq!(network.weights().hidden_output().dim(), (8, 1));
    }
}
