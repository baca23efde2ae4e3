// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment repository.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{BlogDatabase, StorageError, StorageResult, BLOGS, COMMENTS};

/// Comment stored under its parent blog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredComment {
    /// Unique comment identifier (UUID)
    pub id: String,
    /// Blog this comment belongs to
    pub blog_id: String,
    /// Sanitized HTML content
    pub content: String,
    /// Author user ID (set once at creation)
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredComment {
    pub fn new(
        blog_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            blog_id: blog_id.into(),
            content: content.into(),
            author_id: author_id.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

impl super::super::OwnedResource for StoredComment {
    fn author_id(&self) -> &str {
        &self.author_id
    }

    fn resource_type(&self) -> &'static str {
        "comment"
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Repository for comment documents.
pub struct CommentRepository<'a> {
    db: &'a BlogDatabase,
}

impl<'a> CommentRepository<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, comment_id: &str) -> StorageResult<Option<StoredComment>> {
        self.db.get_document(COMMENTS, comment_id)
    }

    /// Load comments in the order given, skipping ids that no longer exist.
    pub fn find_many(&self, comment_ids: &[String]) -> StorageResult<Vec<StoredComment>> {
        let mut comments = Vec::with_capacity(comment_ids.len());
        for id in comment_ids {
            if let Some(comment) = self.find_by_id(id)? {
                comments.push(comment);
            }
        }
        Ok(comments)
    }

    /// Insert or overwrite a comment.
    pub fn save(&self, comment: &StoredComment) -> StorageResult<()> {
        self.db.put_document(COMMENTS, &comment.id, comment)
    }

    pub fn delete_by_id(&self, comment_id: &str) -> StorageResult<bool> {
        self.db.delete_document(COMMENTS, comment_id)
    }

    /// Load a comment of `blog_id`, hand it to `apply`, and write the result
    /// back in one write transaction. Nothing is written if `apply` fails.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the blog is gone, or if the comment
    /// is gone or belongs to another blog.
    pub fn update<F>(
        &self,
        blog_id: &str,
        comment_id: &str,
        apply: F,
    ) -> StorageResult<StoredComment>
    where
        F: FnOnce(&mut StoredComment) -> StorageResult<()>,
    {
        let write_txn = self.db.begin_write()?;
        let comment = {
            let blogs = write_txn.open_table(BLOGS)?;
            if blogs.get(blog_id)?.is_none() {
                return Err(StorageError::not_found("Blog"));
            }

            let mut comments = write_txn.open_table(COMMENTS)?;
            let existing = {
                let guard = comments
                    .get(comment_id)?
                    .ok_or_else(|| StorageError::not_found("Comment"))?;
                guard.value().to_vec()
            };

            let mut comment: StoredComment = serde_json::from_slice(&existing)?;
            if comment.blog_id != blog_id {
                return Err(StorageError::not_found("Comment"));
            }
            apply(&mut comment)?;
            let comment_json = serde_json::to_vec(&comment)?;
            comments.insert(comment_id, comment_json.as_slice())?;
            comment
        };
        write_txn.commit()?;
        Ok(comment)
    }

    /// Delete a batch of comments. Returns how many existed.
    pub fn delete_many(&self, comment_ids: &[String]) -> StorageResult<usize> {
        self.db.delete_documents(COMMENTS, comment_ids)
    }
}
