use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::TransactionKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::{CategoryRepository, SettingsRepository, TransactionRepository};
use crate::storage::traits::Connection;

const DOCUMENT_EXTENSION: &str = "yaml";

/// DocumentConnection owns the store's root directory and performs the
/// file-level document operations the repositories build on
#[derive(Clone)]
pub struct DocumentConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl DocumentConnection {
    /// Open (creating if needed) a store rooted at `base_directory`
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("creating data directory {}", base_path.display()))?;
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn collection_directory(&self, collection: &str) -> PathBuf {
        self.base_directory.join(collection)
    }

    /// Path of a document, or `None` if the id could escape the collection
    fn document_path(&self, collection: &str, id: &str) -> Option<PathBuf> {
        if !is_safe_id(id) {
            return None;
        }
        Some(
            self.collection_directory(collection)
                .join(format!("{}.{}", id, DOCUMENT_EXTENSION)),
        )
    }

    /// Write a document atomically: temp file, then rename over the target
    pub fn write_document<T: Serialize>(&self, collection: &str, id: &str, document: &T) -> Result<()> {
        let path = self
            .document_path(collection, id)
            .with_context(|| format!("invalid document id '{}'", id))?;
        let content = serde_yaml::to_string(document)?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("document store write lock poisoned"))?;

        let directory = self.collection_directory(collection);
        if !directory.exists() {
            fs::create_dir_all(&directory)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        debug!("Wrote {}/{}", collection, id);
        Ok(())
    }

    pub fn read_document<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let path = match self.document_path(collection, id) {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let document = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(document))
    }

    /// Every readable document of a collection, in no particular order
    pub fn read_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let directory = self.collection_directory(collection);
        if !directory.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_yaml::from_str::<T>(&content) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping malformed document {}: {}", path.display(), e),
            }
        }

        Ok(documents)
    }

    /// Returns true if the document existed
    pub fn remove_document(&self, collection: &str, id: &str) -> Result<bool> {
        let path = match self.document_path(collection, id) {
            Some(path) => path,
            None => return Ok(false),
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("document store write lock poisoned"))?;

        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!("Removed {}/{}", collection, id);
        Ok(true)
    }

    /// Returns the number of documents removed
    pub fn remove_collection(&self, collection: &str) -> Result<usize> {
        let directory = self.collection_directory(collection);
        if !directory.exists() {
            return Ok(0);
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("document store write lock poisoned"))?;

        let mut removed = 0;
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Connection for DocumentConnection {
    type CategoryRepository = CategoryRepository;
    type TransactionRepository = TransactionRepository;
    type SettingsRepository = SettingsRepository;

    fn create_category_repository(&self) -> Self::CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    fn create_transaction_repository(&self, kind: TransactionKind) -> Self::TransactionRepository {
        TransactionRepository::new(self.clone(), kind)
    }

    fn create_settings_repository(&self) -> Self::SettingsRepository {
        SettingsRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    fn note(id: &str, text: &str) -> Note {
        Note { id: id.to_string(), text: text.to_string() }
    }

    #[test]
    fn test_write_then_read_document() {
        let dir = TempDir::new().unwrap();
        let conn = DocumentConnection::new(dir.path()).unwrap();

        conn.write_document("notes", "a1", &note("a1", "hello")).unwrap();
        conn.write_document("notes", "a1", &note("a1", "replaced")).unwrap();

        let loaded: Option<Note> = conn.read_document("notes", "a1").unwrap();
        assert_eq!(loaded, Some(note("a1", "replaced")));
        assert!(!conn.collection_directory("notes").join("a1.tmp").exists());
    }

    #[test]
    fn test_unsafe_ids_never_touch_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let conn = DocumentConnection::new(dir.path()).unwrap();

        assert!(conn.write_document("notes", "../escape", &note("x", "y")).is_err());
        let loaded: Option<Note> = conn.read_document("notes", "../../etc/passwd").unwrap();
        assert!(loaded.is_none());
        assert!(!conn.remove_document("notes", "a/b").unwrap());
    }

    #[test]
    fn test_read_collection_skips_malformed_documents() {
        let dir = TempDir::new().unwrap();
        let conn = DocumentConnection::new(dir.path()).unwrap();
        conn.write_document("notes", "a1", &note("a1", "one")).unwrap();
        conn.write_document("notes", "a2", &note("a2", "two")).unwrap();
        fs::write(conn.collection_directory("notes").join("broken.yaml"), "::: not yaml [").unwrap();
        fs::write(conn.collection_directory("notes").join("readme.txt"), "ignored").unwrap();

        let mut notes: Vec<Note> = conn.read_collection("notes").unwrap();
        notes.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(notes, vec![note("a1", "one"), note("a2", "two")]);
    }

    #[test]
    fn test_remove_collection_counts_documents() {
        let dir = TempDir::new().unwrap();
        let conn = DocumentConnection::new(dir.path()).unwrap();
        conn.write_document("notes", "a1", &note("a1", "one")).unwrap();
        conn.write_document("notes", "a2", &note("a2", "two")).unwrap();

        assert_eq!(conn.remove_collection("notes").unwrap(), 2);
        assert_eq!(conn.remove_collection("notes").unwrap(), 0);
        assert_eq!(conn.remove_collection("missing").unwrap(), 0);
    }
}
