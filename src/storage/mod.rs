mod error;
mod file;
mod memory;
mod store;

pub use error::{Result, StorageErr};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::BlobStore;
