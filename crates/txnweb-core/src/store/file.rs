//! JSON-snapshot transaction store
//!
//! Reads are served from memory. A mutation is staged on a copy of the
//! records, written to a temp file that is fsynced and renamed over the
//! snapshot, and only then made visible. A failed write leaves both the
//! in-memory records and the previous snapshot untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::memory::{MemoryStore, StoreData};
use super::TransactionStore;
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{CustomerId, NewTransaction, Transaction, TransactionId};
use crate::query::TransactionFilter;

/// On-disk snapshot layout
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    next_id: TransactionId,
    records: Vec<Transaction>,
}

/// Store that mirrors every write to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the snapshot at `path`, starting empty if it does not exist
    pub async fn open(path: PathBuf) -> CoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure("create directory", parent, e))?;
        }

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_failure("stat", &path, e))?;
        let data = if exists {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| io_failure("read", &path, e))?;
            let data = Self::decode(&content, &path)?;
            log::info!(
                "Loaded {} transactions from {}",
                data.records.len(),
                path.display()
            );
            data
        } else {
            log::info!("No snapshot at {}, starting empty", path.display());
            StoreData::default()
        };

        Ok(Self {
            path,
            inner: MemoryStore::from_data(data),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(content: &str, path: &Path) -> CoreResult<StoreData> {
        let snapshot: Snapshot = serde_json::from_str(content).map_err(|e| {
            log::error!(target: "txnweb::error", "Bad snapshot {}: {}", path.display(), e);
            CoreError::storage("snapshot is not valid JSON")
        })?;
        let mut data = StoreData::default();

        for record in snapshot.records {
            if data.records.insert(record.id, record).is_some() {
                return Err(CoreError::storage("snapshot contains duplicate ids"));
            }
        }

        // Never hand out an id that is already on disk
        let max_id = data.records.keys().next_back().copied().unwrap_or(0);
        data.next_id = snapshot.next_id.max(max_id + 1);
        Ok(data)
    }

    /// Apply `change` to a copy of the records, persist the copy, then
    /// publish it. Writers are serialized by `write_lock`.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> CoreResult<(T, bool)>,
    ) -> CoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut staged = self.inner.snapshot()?;
        let (result, dirty) = change(&mut staged)?;
        if dirty {
            self.persist(&staged).await?;
            self.inner.commit(staged)?;
        }
        Ok(result)
    }

    async fn persist(&self, data: &StoreData) -> CoreResult<()> {
        let snapshot = Snapshot {
            next_id: data.next_id,
            records: data.records.values().cloned().collect(),
        };
        let content = serde_json::to_vec_pretty(&snapshot).map_err(|e| {
            log::error!(target: "txnweb::error", "Snapshot encoding failed: {}", e);
            CoreError::storage("failed to encode snapshot")
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| io_failure("write", &tmp, e))?;
        file.write_all(&content)
            .await
            .map_err(|e| io_failure("write", &tmp, e))?;
        file.sync_all()
            .await
            .map_err(|e| io_failure("sync", &tmp, e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_failure("rename", &tmp, e))?;

        // Best effort: make the rename itself durable
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = tokio::fs::File::open(parent).await {
                let _ = dir.sync_all().await;
            }
        }
        Ok(())
    }
}

/// Build the client-safe error and log the path and cause alongside it
fn io_failure(action: &'static str, path: &Path, source: io::Error) -> CoreError {
    let error = CoreError::io(action, source);
    let context = ErrorContext::new("snapshot file access")
        .with_data("path", serde_json::json!(path.display().to_string()));
    DefaultErrorLogger.log_error(&error, &context);
    error
}

#[async_trait]
impl TransactionStore for FileStore {
    async fn insert(&self, record: NewTransaction) -> CoreResult<Transaction> {
        let transaction = self.mutate(|data| Ok((data.insert(record), true))).await?;
        log::debug!("Inserted transaction {}", transaction.id);
        Ok(transaction)
    }

    async fn get(&self, id: TransactionId) -> CoreResult<Option<Transaction>> {
        self.inner.get(id).await
    }

    async fn replace(&self, record: Transaction) -> CoreResult<Transaction> {
        let transaction = self.mutate(|data| Ok((data.replace(record)?, true))).await?;
        log::debug!("Replaced transaction {}", transaction.id);
        Ok(transaction)
    }

    async fn remove(&self, id: TransactionId) -> CoreResult<bool> {
        let removed = self
            .mutate(|data| {
                let removed = data.remove(id);
                Ok((removed, removed))
            })
            .await?;
        if removed {
            log::debug!("Removed transaction {}", id);
        }
        Ok(removed)
    }

    async fn find(&self, filter: &TransactionFilter) -> CoreResult<Vec<Transaction>> {
        self.inner.find(filter).await
    }

    async fn total_amount(&self, customer_id: CustomerId) -> CoreResult<Option<i64>> {
        self.inner.total_amount(customer_id).await
    }

    async fn count(&self) -> CoreResult<usize> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_tx(amount: i64) -> NewTransaction {
        NewTransaction {
            customer_id: Some(1),
            customer_name: Some("Alice".to_string()),
            amount: Some(amount),
            created_at: NaiveDate::from_ymd_opt(2024, 2, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            is_valid: true,
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");

        let store = FileStore::open(path.clone()).await.unwrap();
        let first = store.insert(new_tx(100)).await.unwrap();
        let second = store.insert(new_tx(200)).await.unwrap();
        store.remove(first.id).await.unwrap();
        drop(store);

        let reopened = FileStore::open(path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert_eq!(reopened.get(second.id).await.unwrap(), Some(second));

        let third = reopened.insert(new_tx(300)).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_replace_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");

        let store = FileStore::open(path.clone()).await.unwrap();
        let mut tx = store.insert(new_tx(100)).await.unwrap();
        tx.amount = Some(700);
        store.replace(tx.clone()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("700"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::open(path).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::StorageError);
        assert_eq!(err.to_string(), "Storage error: snapshot is not valid JSON");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_records_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        let store = FileStore::open(path.clone()).await.unwrap();
        let kept = store.insert(new_tx(100)).await.unwrap();

        // A directory where the temp file goes makes every write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store.insert(new_tx(200)).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::IoError);
        assert_eq!(err.to_string(), "Snapshot write failed");
        assert!(!err.to_string().contains(&dir.path().display().to_string()));

        let mut changed = kept.clone();
        changed.amount = Some(999);
        assert!(store.replace(changed).await.is_err());
        assert!(store.remove(kept.id).await.is_err());

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(kept.id).await.unwrap(), Some(kept.clone()));
        assert_eq!(store.get(kept.id + 1).await.unwrap(), None);

        let reopened = FileStore::open(path).await.unwrap();
        assert_eq!(reopened.find(&TransactionFilter::All).await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_id_is_reissued_after_failed_insert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        let store = FileStore::open(path.clone()).await.unwrap();
        let blocker = path.with_extension("json.tmp");

        std::fs::create_dir(&blocker).unwrap();
        assert!(store.insert(new_tx(1)).await.is_err());
        std::fs::remove_dir(&blocker).unwrap();

        let inserted = store.insert(new_tx(2)).await.unwrap();
        assert_eq!(inserted.id, 1);
        assert_eq!(store.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_next_id_is_above_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        let record = new_tx(5).into_transaction(10);
        let snapshot = serde_json::json!({ "nextId": 1, "records": [record] });
        std::fs::write(&path, snapshot.to_string()).unwrap();

        let store = FileStore::open(path).await.unwrap();
        let inserted = store.insert(new_tx(6)).await.unwrap();
        assert_eq!(inserted.id, 11);
    }
}
