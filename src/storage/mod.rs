// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users, blogs, comments and the audit trail, kept in
//! a single embedded redb file under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/blog.redb
//!   users          user_id  -> StoredUser
//!   usernames      username -> user_id
//!   blogs          blog_id  -> StoredBlog (holds ordered comment ids)
//!   comments       comment_id -> StoredComment
//!   audit_events   date/micros/event_id -> AuditEvent
//! ```
//!
//! ## Important Notes
//!
//! - Repositories are synchronous; async handlers reach them through
//!   [`run_blocking`], which bounds every call with the store timeout
//! - Plaintext passwords never reach this module
//! - Ownership checks live in [`ownership`] and run before any mutation

pub mod audit;
pub mod database;
pub mod ownership;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use database::{run_blocking, BlogDatabase, StorageError, StorageResult};
pub use ownership::{check_owner, verify_comment_removal, OwnedResource, OwnershipEnforcer};
pub use repository::{
    BlogRepository, CommentRepository, StoredBlog, StoredComment, StoredUser, UserRepository,
};
