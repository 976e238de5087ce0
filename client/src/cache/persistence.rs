//! Durable snapshots of cached collections, one JSON file per collection.
//!
//! A store without a directory is memory-only: saves are dropped and loads
//! find nothing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::entry::CacheSnapshot;
use super::Collection;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    directory: Option<PathBuf>,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: Some(directory.as_ref().to_path_buf()),
        }
    }

    pub fn in_memory() -> Self {
        Self { directory: None }
    }

    pub fn from_optional(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    fn path(&self, collection: Collection) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", collection.storage_key())))
    }

    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> ClientResult<Option<CacheSnapshot<T>>> {
        let path = match self.path(collection) {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| ClientError::Storage(format!("reading {}: {}", path.display(), e)))?;
        let snapshot = serde_json::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("parsing {}: {}", path.display(), e)))?;
        Ok(Some(snapshot))
    }

    pub fn save<T: Serialize>(&self, collection: Collection, snapshot: &CacheSnapshot<T>) -> ClientResult<()> {
        let (directory, path) = match (&self.directory, self.path(collection)) {
            (Some(directory), Some(path)) => (directory, path),
            _ => return Ok(()),
        };

        let content = serde_json::to_string(snapshot)
            .map_err(|e| ClientError::Storage(format!("serializing {}: {}", collection.storage_key(), e)))?;

        fs::create_dir_all(directory)
            .map_err(|e| ClientError::Storage(format!("creating {}: {}", directory.display(), e)))?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .and_then(|_| fs::rename(&temp_path, &path))
            .map_err(|e| ClientError::Storage(format!("writing {}: {}", path.display(), e)))?;

        debug!("Saved snapshot {}", path.display());
        Ok(())
    }

    pub fn remove(&self, collection: Collection) -> ClientResult<()> {
        match self.path(collection) {
            Some(path) if path.exists() => fs::remove_file(&path)
                .map_err(|e| ClientError::Storage(format!("removing {}: {}", path.display(), e))),
            _ => Ok(()),
        }
    }
}
