//! Core DocumentStore implementation

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Unique identifier for a stored document
pub type DocumentId = String;

/// A document as persisted on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Generated identifier (UUIDv7, so ids sort by creation time)
    pub id: DocumentId,
    /// Store-side timestamp (unix ms)
    pub created_at: i64,
    /// Caller-supplied payload
    pub data: serde_json::Value,
}

/// Statistics for a collection
#[derive(Debug, Clone)]
pub struct CollectionStats {
    /// Number of documents
    pub document_count: usize,
    /// Size of the collection file in bytes
    pub total_bytes: u64,
    /// Oldest creation timestamp (unix ms)
    pub first_created_at: Option<i64>,
    /// Newest creation timestamp (unix ms)
    pub last_created_at: Option<i64>,
}

/// The main document store
pub struct DocumentStore {
    /// Base path for storage
    base_path: PathBuf,
    /// Serializes appends so concurrent writers never interleave lines
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open or create a document store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened document store");
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the store directory
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        if collection.is_empty()
            || !collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(eyre!("Invalid collection name: '{}'", collection));
        }
        Ok(self.base_path.join(format!("{}.jsonl", collection)))
    }

    /// Append a document to a collection, returning its generated id
    pub fn add<T: Serialize>(&self, collection: &str, data: &T) -> Result<DocumentId> {
        let path = self.collection_path(collection)?;
        let doc = StoredDocument {
            id: Uuid::now_v7().to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
            data: serde_json::to_value(data).context("Failed to serialize document")?,
        };
        let line = serde_json::to_string(&doc)?;

        let _guard = self.write_lock.lock().map_err(|_| eyre!("Document store lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(format!("Failed to open collection: {}", path.display()))?;
        writeln!(file, "{}", line)?;

        info!(collection, id = %doc.id, "Stored document");
        Ok(doc.id)
    }

    /// Read every document in a collection, oldest first
    pub fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            debug!(collection, "list: collection does not exist yet");
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut docs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let doc: StoredDocument =
                serde_json::from_str(&line).context(format!("Corrupt line in {}", path.display()))?;
            docs.push(doc);
        }
        Ok(docs)
    }

    /// Fetch a single document by id
    pub fn get(&self, collection: &str, id: &str) -> Result<StoredDocument> {
        self.list(collection)?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| eyre!("Document not found: {}/{}", collection, id))
    }

    /// Get statistics for a collection
    pub fn stats(&self, collection: &str) -> Result<CollectionStats> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Err(eyre!("Collection not found: {}", collection));
        }

        let docs = self.list(collection)?;
        Ok(CollectionStats {
            document_count: docs.len(),
            total_bytes: fs::metadata(&path)?.len(),
            first_created_at: docs.iter().map(|d| d.created_at).min(),
            last_created_at: docs.iter().map(|d| d.created_at).max(),
        })
    }

    /// List all collection names
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let mut collections = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "jsonl").unwrap_or(false)
                && let Some(name) = path.file_stem().and_then(|s| s.to_str())
            {
                collections.push(name.to_string());
            }
        }

        collections.sort();
        Ok(collections)
    }

    /// Delete a collection and all its documents
    pub fn delete(&self, collection: &str) -> Result<()> {
        let path = self.collection_path(collection)?;
        if path.exists() {
            fs::remove_file(&path)?;
            info!(collection, "Deleted collection");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_and_get() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path().join("store")).unwrap();

        let id = store
            .add("feedbacks", &serde_json::json!({ "rating": 4, "comment": "useful" }))
            .unwrap();

        let doc = store.get("feedbacks", &id).unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.data["rating"], 4);
        assert_eq!(doc.data["comment"], "useful");
        assert!(doc.created_at > 0);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();

        let first = store.add("feedbacks", &serde_json::json!({ "n": 1 })).unwrap();
        let second = store.add("feedbacks", &serde_json::json!({ "n": 2 })).unwrap();
        assert_ne!(first, second);

        let docs = store.list("feedbacks").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].data["n"], 1);
        assert_eq!(docs[1].data["n"], 2);
    }

    #[test]
    fn test_list_missing_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        assert!(store.list("nothing-here").unwrap().is_empty());
        assert!(store.stats("nothing-here").is_err());
    }

    #[test]
    fn test_rejects_bad_collection_names() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        assert!(store.add("../escape", &serde_json::json!({})).is_err());
        assert!(store.add("", &serde_json::json!({})).is_err());
    }

    #[test]
    fn test_stats_and_collections() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        store.add("feedbacks", &serde_json::json!({ "rating": 5 })).unwrap();
        store.add("feedbacks", &serde_json::json!({ "rating": 3 })).unwrap();
        store.add("audit", &serde_json::json!({ "event": "x" })).unwrap();

        let stats = store.stats("feedbacks").unwrap();
        assert_eq!(stats.document_count, 2);
        assert!(stats.total_bytes > 0);
        assert!(stats.first_created_at <= stats.last_created_at);

        assert_eq!(store.list_collections().unwrap(), vec!["audit", "feedbacks"]);

        store.delete("audit").unwrap();
        assert_eq!(store.list_collections().unwrap(), vec!["feedbacks"]);
    }

    #[test]
    fn test_missing_document() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path()).unwrap();
        store.add("feedbacks", &serde_json::json!({ "rating": 1 })).unwrap();
        assert!(store.get("feedbacks", "not-an-id").is_err());
    }
}
