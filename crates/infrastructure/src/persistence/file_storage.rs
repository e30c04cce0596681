//! Client storage persisted as a single JSON file.
//!
//! The file holds one flat object of string values:
//!
//! ```json
//! {
//!   "netflix.token": "{\"access_token\":\"...\"}",
//!   "usuario": "{\"slug\":\"ana\",...}"
//! }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use marquee_application::ports::{ClientStorage, StorageError};
use tokio::fs;
use tokio::sync::Mutex;

use crate::serialization::{SerializationError, from_json, to_json_stable};

const FILE_NAME: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// [`ClientStorage`] backed by a JSON file on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a storage over `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Platform config location:
    /// - Linux: ~/.config/marquee/storage.json
    /// - macOS: ~/Library/Application Support/marquee/storage.json
    /// - Windows: %APPDATA%/marquee/storage.json
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marquee").join(FILE_NAME))
    }

    /// The file this storage reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => from_json(&bytes).map_err(storage_error),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = to_json_stable(entries).map_err(storage_error)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

fn storage_error(error: SerializationError) -> StorageError {
    StorageError::Serialization(error.to_string())
}

#[async_trait]
impl ClientStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await?;
        tracing::debug!(key, path = %self.path.display(), "storage entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
