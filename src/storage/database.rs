// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `usernames`: username → user_id (uniqueness index)
//! - `blogs`: blog_id → serialized StoredBlog
//! - `comments`: comment_id → serialized StoredComment
//! - `audit_events`: `date/micros/event_id` → serialized AuditEvent
//!
//! redb serializes write transactions, so every read-modify-write performed
//! inside a single `begin_write()` is atomic with respect to other requests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// A table holding JSON documents keyed by string id.
pub type DocumentTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Primary user table: user_id → StoredUser (JSON bytes).
pub const USERS: DocumentTable = TableDefinition::new("users");

/// Unique index: username → user_id.
pub const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

/// Blog posts: blog_id → StoredBlog (JSON bytes).
pub const BLOGS: DocumentTable = TableDefinition::new("blogs");

/// Comments: comment_id → StoredComment (JSON bytes).
pub const COMMENTS: DocumentTable = TableDefinition::new("comments");

/// Audit trail: `YYYY-MM-DD/micros/event_id` → AuditEvent (JSON bytes).
pub const AUDIT_EVENTS: DocumentTable = TableDefinition::new("audit_events");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cannot prepare data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Ownership check failed.
    #[error("permission denied: user {user_id} cannot modify {resource} {resource_id}")]
    PermissionDenied {
        user_id: String,
        resource: &'static str,
        resource_id: String,
    },

    #[error("store call exceeded {0:?}")]
    Timeout(Duration),

    #[error("store task failed: {0}")]
    TaskFailed(String),
}

impl StorageError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        StorageError::NotFound(entity.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// BlogDatabase
// =============================================================================

/// Embedded ACID document database.
pub struct BlogDatabase {
    db: Database,
    path: PathBuf,
}

impl BlogDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
            let _ = write_txn.open_table(BLOGS)?;
            let _ = write_txn.open_table(COMMENTS)?;
            let _ = write_txn.open_table(AUDIT_EVENTS)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened blog database");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let _ = table.get("")?;
        Ok(())
    }

    // =========================================================================
    // Generic document operations
    // =========================================================================

    /// Look up and deserialize a single document.
    pub fn get_document<T: DeserializeOwned>(
        &self,
        table: DocumentTable,
        id: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or overwrite a document (last writer wins).
    pub fn put_document<T: Serialize>(
        &self,
        table: DocumentTable,
        id: &str,
        document: &T,
    ) -> StorageResult<()> {
        let json = serde_json::to_vec(document)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table)?;
            table.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete_document(&self, table: DocumentTable, id: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(table)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Remove several documents in one transaction. Returns how many existed.
    pub fn delete_documents(&self, table: DocumentTable, ids: &[String]) -> StorageResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let write_txn = self.db.begin_write()?;
        let mut removed = 0;
        {
            let mut table = write_txn.open_table(table)?;
            for id in ids {
                if table.remove(id.as_str())?.is_some() {
                    removed += 1;
                }
            }
        }
        write_txn.commit()?;
        Ok(removed)
    }

    /// Deserialize every document in a table, in key order.
    pub fn list_documents<T: DeserializeOwned>(&self, table: DocumentTable) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut documents = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            documents.push(serde_json::from_slice(value.value())?);
        }
        Ok(documents)
    }
}

/// Run a synchronous database operation on the blocking pool, bounded by `timeout`.
///
/// The operation keeps running to completion if the timeout fires; only the
/// caller stops waiting for it. A write that times out may therefore still
/// commit after the caller has reported `StorageError::Timeout`.
pub async fn run_blocking<T, F>(db: Arc<BlogDatabase>, timeout: Duration, op: F) -> StorageResult<T>
where
    F: FnOnce(&BlogDatabase) -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || op(&db));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(StorageError::TaskFailed(join_error.to_string())),
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Store call timed out");
            Err(StorageError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestDoc {
        id: String,
        value: i32,
    }

    fn setup() -> (TempDir, BlogDatabase) {
        let temp = TempDir::new().unwrap();
        let db = BlogDatabase::open(&temp.path().join("blog.redb")).unwrap();
        (temp, db)
    }

    #[test]
    fn open_creates_file_and_passes_health_check() {
        let (temp, db) = setup();
        assert!(temp.path().join("blog.redb").exists());
        assert_eq!(db.path(), temp.path().join("blog.redb"));
        db.health_check().expect("health check should pass");
    }

    #[test]
    fn put_get_and_overwrite_document() {
        let (_temp, db) = setup();
        let doc = TestDoc {
            id: "d1".to_string(),
            value: 1,
        };
        db.put_document(BLOGS, "d1", &doc).unwrap();
        assert_eq!(db.get_document::<TestDoc>(BLOGS, "d1").unwrap(), Some(doc));

        let updated = TestDoc {
            id: "d1".to_string(),
            value: 2,
        };
        db.put_document(BLOGS, "d1", &updated).unwrap();
        assert_eq!(db.get_document::<TestDoc>(BLOGS, "d1").unwrap(), Some(updated));
    }

    #[test]
    fn missing_document_is_none() {
        let (_temp, db) = setup();
        assert_eq!(db.get_document::<TestDoc>(COMMENTS, "nope").unwrap(), None);
    }

    #[test]
    fn delete_document_reports_existence() {
        let (_temp, db) = setup();
        db.put_document(COMMENTS, "c1", &TestDoc { id: "c1".into(), value: 0 })
            .unwrap();

        assert!(db.delete_document(COMMENTS, "c1").unwrap());
        assert!(!db.delete_document(COMMENTS, "c1").unwrap());
    }

    #[test]
    fn delete_documents_counts_only_existing() {
        let (_temp, db) = setup();
        for i in 1..=3 {
            let id = format!("c{i}");
            db.put_document(COMMENTS, &id, &TestDoc { id: id.clone(), value: i })
                .unwrap();
        }

        let ids = vec!["c1".to_string(), "c3".to_string(), "c9".to_string()];
        assert_eq!(db.delete_documents(COMMENTS, &ids).unwrap(), 2);

        let remaining: Vec<TestDoc> = db.list_documents(COMMENTS).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "c2");
    }

    #[test]
    fn open_fails_when_data_dir_cannot_be_created() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let result = BlogDatabase::open(&blocker.join("nested").join("blog.redb"));
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn run_blocking_returns_operation_result() {
        let (_temp, db) = setup();
        let db = Arc::new(db);

        let value = run_blocking(db, Duration::from_secs(5), |db| {
            db.put_document(BLOGS, "b1", &TestDoc { id: "b1".into(), value: 7 })?;
            db.get_document::<TestDoc>(BLOGS, "b1")
        })
        .await
        .unwrap();

        assert_eq!(value.map(|d| d.value), Some(7));
    }

    #[tokio::test]
    async fn run_blocking_times_out() {
        let (_temp, db) = setup();
        let db = Arc::new(db);

        let result = run_blocking(db, Duration::from_millis(10), |_| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(StorageError::Timeout(_))));
    }
}
