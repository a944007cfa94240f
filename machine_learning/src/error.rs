use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    InvalidConfig(&'static str),
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    NonFinite {
        what: &'static str,
    },
    OutOfRange {
        what: &'static str,
        value: f32,
    },
    /// A persisted model failed structural validation.
    Corrupt(String),
    Encode(serde_json::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidConfig(msg) => write!(f, "invalid network config: {msg}"),
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::NonFinite { what } => write!(f, "{what} contains a non finite value"),
            MlErr::OutOfRange { what, value } => {
                write!(f, "{what} must be within [0, 1], got {value}")
            }
            MlErr::Corrupt(detail) => write!(f, "corrupt model artifact: {detail}"),
            MlErr::Encode(e) => write!(f, "failed to encode model artifact: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Encode(e) => Some(e),
            _ => None,
        }
    }
}
