mod report;
mod trainer;

pub use report::TrainingReport;
pub use trainer::{DEFAULT_EPOCHS, DEFAULT_LOG_EVERY, Trainer};
