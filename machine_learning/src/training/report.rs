use std::time::Duration;

use serde::Serialize;

/// Statistics of a full training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    epochs: usize,
    examples: usize,
    losses: Vec<f32>,
    elapsed: Duration,
}

impl TrainingReport {
    pub(super) fn new(examples: usize, losses: Vec<f32>, elapsed: Duration) -> Self {
        Self {
            epochs: losses.len(),
            examples,
            losses,
            elapsed,
        }
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn examples(&self) -> usize {
        self.examples
    }

    /// The mean absolute error of the last epoch.
    pub fn final_error(&self) -> f32 {
        self.losses.last().copied().unwrap_or_default()
    }

    /// The mean absolute error of each epoch, in order.
    pub fn losses(&self) -> &[f32] {
        &self.losses
    }

    /// Wall clock time spent training.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
