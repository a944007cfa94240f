pub mod config;
pub mod error;
pub mod interpreter;
pub mod lifecycle;
pub mod storage;
pub mod subscores;
pub mod synthesis;

pub use config::EngineConfig;
pub use error::{EngineErr, Result};
pub use interpreter::{ConfidenceLevel, Prediction, Recommendation, interpret};
pub use lifecycle::{LoadReport, ModelManager, ModelOrigin, ModelState, RetrainReport};
pub use subscores::SubScores;
