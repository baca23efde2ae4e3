// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blog repository.
//!
//! A blog owns the ordered list of its comment ids. Attaching and detaching
//! a comment updates the blog and the comment table in one write transaction.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{BlogDatabase, StorageError, StorageResult, BLOGS, COMMENTS};
use super::comments::StoredComment;

/// Blog post document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredBlog {
    /// Unique blog identifier (UUID)
    pub id: String,
    pub title: String,
    /// Sanitized HTML body
    pub body: String,
    /// Author user ID (set once at creation)
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Comment ids in posting order
    #[serde(default)]
    pub comment_ids: Vec<String>,
}

impl StoredBlog {
    pub fn new(
        author_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            author_id: author_id.into(),
            created_at: Utc::now(),
            updated_at: None,
            comment_ids: Vec::new(),
        }
    }
}

impl super::super::OwnedResource for StoredBlog {
    fn author_id(&self) -> &str {
        &self.author_id
    }

    fn resource_type(&self) -> &'static str {
        "blog"
    }

    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Repository for blog documents.
pub struct BlogRepository<'a> {
    db: &'a BlogDatabase,
}

impl<'a> BlogRepository<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, blog_id: &str) -> StorageResult<Option<StoredBlog>> {
        self.db.get_document(BLOGS, blog_id)
    }

    /// Every blog, oldest first.
    pub fn list(&self) -> StorageResult<Vec<StoredBlog>> {
        let mut blogs: Vec<StoredBlog> = self.db.list_documents(BLOGS)?;
        blogs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(blogs)
    }

    /// Insert or overwrite a blog.
    pub fn save(&self, blog: &StoredBlog) -> StorageResult<()> {
        self.db.put_document(BLOGS, &blog.id, blog)
    }

    pub fn delete_by_id(&self, blog_id: &str) -> StorageResult<bool> {
        self.db.delete_document(BLOGS, blog_id)
    }

    /// Load a blog, hand it to `apply`, and write the result back in one
    /// write transaction. Nothing is written if `apply` fails.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the blog does not exist.
    pub fn update<F>(&self, blog_id: &str, apply: F) -> StorageResult<StoredBlog>
    where
        F: FnOnce(&mut StoredBlog) -> StorageResult<()>,
    {
        let write_txn = self.db.begin_write()?;
        let blog = {
            let mut blogs = write_txn.open_table(BLOGS)?;

            let existing = {
                let guard = blogs
                    .get(blog_id)?
                    .ok_or_else(|| StorageError::not_found("Blog"))?;
                guard.value().to_vec()
            };

            let mut blog: StoredBlog = serde_json::from_slice(&existing)?;
            apply(&mut blog)?;
            let blog_json = serde_json::to_vec(&blog)?;
            blogs.insert(blog_id, blog_json.as_slice())?;
            blog
        };
        write_txn.commit()?;
        Ok(blog)
    }

    /// Delete a blog together with every comment it lists, in one transaction.
    ///
    /// Returns the number of comments removed, or `None` if the blog was absent.
    pub fn delete_with_comments(&self, blog_id: &str) -> StorageResult<Option<usize>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut blogs = write_txn.open_table(BLOGS)?;
            let existing = match blogs.remove(blog_id)? {
                Some(guard) => guard.value().to_vec(),
                None => return Ok(None),
            };
            let blog: StoredBlog = serde_json::from_slice(&existing)?;

            let mut comments = write_txn.open_table(COMMENTS)?;
            let mut removed = 0;
            for comment_id in &blog.comment_ids {
                if comments.remove(comment_id.as_str())?.is_some() {
                    removed += 1;
                }
            }
            removed
        };
        write_txn.commit()?;
        Ok(Some(removed))
    }

    /// Store a new comment and append it to its blog.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the blog does not exist; nothing is written.
    pub fn attach_comment(&self, comment: &StoredComment) -> StorageResult<()> {
        let comment_json = serde_json::to_vec(comment)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut blogs = write_txn.open_table(BLOGS)?;

            let existing = {
                let guard = blogs
                    .get(comment.blog_id.as_str())?
                    .ok_or_else(|| StorageError::not_found("Blog"))?;
                guard.value().to_vec()
            };

            let mut blog: StoredBlog = serde_json::from_slice(&existing)?;
            blog.comment_ids.push(comment.id.clone());
            let blog_json = serde_json::to_vec(&blog)?;
            blogs.insert(blog.id.as_str(), blog_json.as_slice())?;

            let mut comments = write_txn.open_table(COMMENTS)?;
            comments.insert(comment.id.as_str(), comment_json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a comment from its blog and delete the comment document.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the blog does not exist.
    pub fn detach_comment(&self, blog_id: &str, comment_id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut blogs = write_txn.open_table(BLOGS)?;

            let existing = {
                let guard = blogs
                    .get(blog_id)?
                    .ok_or_else(|| StorageError::not_found("Blog"))?;
                guard.value().to_vec()
            };

            let mut blog: StoredBlog = serde_json::from_slice(&existing)?;
            blog.comment_ids.retain(|id| id != comment_id);
            let blog_json = serde_json::to_vec(&blog)?;
            blogs.insert(blog_id, blog_json.as_slice())?;

            let mut comments = write_txn.open_table(COMMENTS)?;
            comments.remove(comment_id)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
