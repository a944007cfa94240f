use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::debug;

use super::{BlobStore, Result, StorageErr};

/// A `BlobStore` keeping one `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a new `FileStore`, the directory is created on the first write.
    ///
    /// # Arguments
    /// * `root` - The directory holding the blobs.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the file backing `key`.
    ///
    /// # Returns
    /// `StorageErr::InvalidKey` if the key could escape the root directory.
    pub fn path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StorageErr::InvalidKey {
                key: key.to_string(),
            });
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path(key)?;

        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageErr::NotFound {
                key: key.to_string(),
            },
            _ => StorageErr::Io(e),
        })
    }

    /// Writes to a sibling temporary file first and renames it over the target, so readers
    /// never observe a partially written blob.
    fn write(&self, key: &str, blob: &[u8]) -> Result<()> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)?;

        let mut file = fs::File::create(&tmp)?;
        file.write_all(blob)?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        debug!(path:? = path, bytes = blob.len(); "blob written");
        Ok(())
    }
}
