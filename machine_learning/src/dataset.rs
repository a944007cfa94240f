use ndarray::ArrayView1;
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// A single supervised sample, every value is normalized to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    input: Vec<f32>,
    target: Vec<f32>,
}

impl TrainingExample {
    pub fn new(input: Vec<f32>, target: Vec<f32>) -> Self {
        Self { input, target }
    }

    pub fn input(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.input[..])
    }

    pub fn target(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.target[..])
    }
}

/// An in-memory, validated set of `TrainingExample`s.
#[derive(Debug, Clone)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    examples: Vec<TrainingExample>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `examples` - The samples.
    /// * `x_size` - The expected input length of every sample.
    /// * `y_size` - The expected target length of every sample.
    ///
    /// # Returns
    /// An error if any sample has the wrong shape or a value outside `[0, 1]`.
    pub fn new(examples: Vec<TrainingExample>, x_size: usize, y_size: usize) -> Result<Self> {
        for example in &examples {
            check_values("input", &example.input, x_size)?;
            check_values("target", &example.target, y_size)?;
        }

        Ok(Self {
            x_size,
            y_size,
            examples,
        })
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Shuffles the samples in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.examples.shuffle(rng);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> {
        self.examples.iter()
    }
}

fn check_values(what: &'static str, values: &[f32], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(MlErr::SizeMismatch {
            what,
            got: values.len(),
            expected,
        });
    }

    if let Some(&value) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        return Err(MlErr::OutOfRange { what, value });
    }

    Ok(())
}
