use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{LnError, Note, Result, Todo};

/// Schema version written into every snapshot.
pub const SCHEMA_VERSION: u32 = 1;

/// Key the application state is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "persist:life-notes";

/// Opaque key-value blob store the application state is flushed to.
pub trait BlobStore {
    /// Returns the blob stored under `key`, or `None` if there is none
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`
    fn save(&mut self, key: &str, blob: &str) -> Result<()>;

    /// Removes the blob stored under `key`; a missing blob is not an error
    fn clear(&mut self, key: &str) -> Result<()>;
}

/// Serialized form of both collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl Snapshot {
    pub fn new(notes: Vec<Note>, todos: Vec<Todo>) -> Self {
        Snapshot {
            version: SCHEMA_VERSION,
            notes,
            todos,
        }
    }

    pub fn empty() -> Self {
        Snapshot::new(Vec::new(), Vec::new())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a stored blob. Anything unreadable, including a snapshot from a
    /// newer schema, decodes to an empty snapshot.
    pub fn from_blob(blob: Option<&str>) -> Snapshot {
        let Some(blob) = blob else {
            debug!("No persisted snapshot, starting empty");
            return Snapshot::empty();
        };

        match serde_json::from_str::<Snapshot>(blob) {
            Ok(snapshot) if snapshot.version > SCHEMA_VERSION => {
                warn!(
                    "Persisted snapshot has schema version {} (supported: {}), starting empty",
                    snapshot.version, SCHEMA_VERSION
                );
                Snapshot::empty()
            }
            Ok(snapshot) => {
                info!(
                    "Rehydrated {} notes and {} todos",
                    snapshot.notes.len(),
                    snapshot.todos.len()
                );
                snapshot
            }
            Err(e) => {
                warn!("Persisted snapshot is corrupt, starting empty: {}", e);
                Snapshot::empty()
            }
        }
    }
}

/// Stores each blob as `<dir>/<encoded key>.json`, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Creates the store, making sure `dir` exists
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                LnError::DirectoryError { path: dir.clone() }
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key. ASCII alphanumerics and `-` pass through; every
    /// other byte becomes `_xx`, so two keys never map to the same file.
    fn blob_path(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("_{:02x}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        trace!("Loading blob from {}", path.display());
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read blob {}: {}", path.display(), e);
                Err(LnError::Io(e))
            }
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.blob_path(key);
        debug!("Saving blob to {}", path.display());

        // Create a temporary file in the same directory (for atomic operation)
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            LnError::Io(e)
        })?;

        temp_file.write_all(blob.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            LnError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            LnError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            LnError::Io(e.error)
        })?;

        trace!("Blob saved: {}", key);
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed persisted blob {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove blob {}: {}", path.display(), e);
                Err(LnError::Io(e))
            }
        }
    }
}

/// Keeps blobs in memory. Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}
