//! Synthetic training data for bootstrapping the model without real outcome history.

use machine_learning::{
    Result,
    arch::{INPUT_SIZE, OUTPUT_SIZE},
    dataset::{Dataset, TrainingExample},
};
use rand::Rng;

use crate::subscores::MAX_SUBSCORE;

/// Weights of skills, experience, location and salary in the composite score.
pub const COMPOSITE_WEIGHTS: [f32; INPUT_SIZE] = [0.50, 0.30, 0.15, 0.05];

/// Composite thresholds paired with the probability range sampled above them.
const BANDS: [(f32, f32, f32); 3] = [(80., 0.75, 0.95), (60., 0.45, 0.75), (40., 0.15, 0.45)];

/// Probability range sampled below every threshold.
const FLOOR_BAND: (f32, f32) = (0.05, 0.20);

const HIGH_SKILLS: f32 = 90.;
const HIGH_SKILLS_BOOST: f32 = 0.15;
const HIGH_SKILLS_CAP: f32 = 0.98;

const LOW_SKILLS: f32 = 30.;
const LOW_SKILLS_PENALTY: f32 = 0.20;
const LOW_SKILLS_FLOOR: f32 = 0.02;

/// Generates labeled examples approximating a plausible acceptance curve.
///
/// Reproducibility depends entirely on the injected random source.
pub struct Synthesizer<R: Rng> {
    rng: R,
}

impl<R: Rng> Synthesizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates `count` examples with normalized inputs and targets.
    pub fn generate(&mut self, count: usize) -> Vec<TrainingExample> {
        (0..count).map(|_| self.example()).collect()
    }

    /// Generates `count` examples wrapped in a validated `Dataset`.
    pub fn dataset(&mut self, count: usize) -> Result<Dataset> {
        Dataset::new(self.generate(count), INPUT_SIZE, OUTPUT_SIZE)
    }

    fn example(&mut self) -> TrainingExample {
        let scores: [f32; INPUT_SIZE] =
            std::array::from_fn(|_| self.rng.random_range(0.0..=MAX_SUBSCORE));

        let mut probability = self.base_probability(composite(&scores));
        probability = skills_override(scores[0], probability);

        let input = scores.iter().map(|s| s / MAX_SUBSCORE).collect();
        TrainingExample::new(input, vec![probability])
    }

    fn base_probability(&mut self, composite: f32) -> f32 {
        let (low, high) = BANDS
            .iter()
            .find(|(threshold, _, _)| composite >= *threshold)
            .map(|&(_, low, high)| (low, high))
            .unwrap_or(FLOOR_BAND);

        self.rng.random_range(low..high)
    }
}

/// The weighted sum of the raw sub-scores.
pub fn composite(scores: &[f32; INPUT_SIZE]) -> f32 {
    scores.iter().zip(COMPOSITE_WEIGHTS).map(|(s, w)| s * w).sum()
}

/// Skills dominate the other sub-scores regardless of the composite band.
pub fn skills_override(skills: f32, probability: f32) -> f32 {
    if skills >= HIGH_SKILLS {
        (probability + HIGH_SKILLS_BOOST).min(HIGH_SKILLS_CAP)
    } else if skills < LOW_SKILLS {
        (probability - LOW_SKILLS_PENALTY).max(LOW_SKILLS_FLOOR)
    } else {
        probability
    }
}
