use super::Result;

/// A key-value blob store holding persisted models.
///
/// Implementations are blocking, callers on an async runtime run them on the blocking pool.
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`.
    ///
    /// # Returns
    /// `StorageErr::NotFound` if there's no such blob.
    fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Stores `blob` under `key`, replacing any previous value.
    fn write(&self, key: &str, blob: &[u8]) -> Result<()>;
}
