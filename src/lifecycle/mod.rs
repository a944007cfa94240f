mod bootstrap;
mod manager;
mod report;

pub use bootstrap::train_model;
pub use manager::ModelManager;
pub use report::{LoadReport, ModelOrigin, ModelState, RetrainReport};
