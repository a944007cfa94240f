use std::collections::HashMap;

use parking_lot::RwLock;

use super::{BlobStore, Result, StorageErr};

/// A process-local `BlobStore`, its contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageErr::NotFound {
                key: key.to_string(),
            })
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<()> {
        self.blobs.write().insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let store = MemoryStore::new();
        assert!(matches!(store.read("k"), Err(StorageErr::NotFound { .. })));

        store.write("k", &[1, 2, 3]).unwrap();
        assert_eq!(store.read("k").unwrap(), vec![1, 2, 3]);
    }
}
