use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The specific result type of the storage module.
pub type Result<T> = std::result::Result<T, StorageErr>;

/// Failures of a `BlobStore`.
#[derive(Debug)]
pub enum StorageErr {
    NotFound { key: String },
    InvalidKey { key: String },
    Io(io::Error),
}

impl Display for StorageErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErr::NotFound { key } => write!(f, "no blob stored under {key:?}"),
            StorageErr::InvalidKey { key } => write!(f, "invalid blob key {key:?}"),
            StorageErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for StorageErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
