// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the BlogDatabase for all table operations.

pub mod blogs;
pub mod comments;
pub mod users;

pub use blogs::{BlogRepository, StoredBlog};
pub use comments::{CommentRepository, StoredComment};
pub use users::{StoredUser, UserRepository};
