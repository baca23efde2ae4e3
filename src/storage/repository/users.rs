// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store.
//!
//! Users live in the `users` table keyed by id; the `usernames` table is a
//! unique index maintained in the same write transaction, so two concurrent
//! registrations of one username cannot both commit.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{BlogDatabase, StorageError, StorageResult, USERNAMES, USERS};

/// User record as persisted. The plaintext password is never stored.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Unique login name
    pub username: String,
    /// bcrypt digest of the password
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a new user record with a fresh id.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a BlogDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self { db }
    }

    /// Get a user by id.
    pub fn find_by_id(&self, user_id: &str) -> StorageResult<Option<StoredUser>> {
        self.db.get_document(USERS, user_id)
    }

    /// Get a user by exact username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(USERNAMES)?;
        let user_id = match index.get(username)? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };

        let users = read_txn.open_table(USERS)?;
        let user = match users.get(user_id.as_str())? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(user)
    }

    /// Insert a new user.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` if the username is taken.
    pub fn insert(&self, user: StoredUser) -> StorageResult<StoredUser> {
        let json = serde_json::to_vec(&user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut usernames = write_txn.open_table(USERNAMES)?;
            if usernames.get(user.username.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("User {}", user.username)));
            }
            usernames.insert(user.username.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(user_id = %user.id, username = %user.username, "Inserted user");
        Ok(user)
    }
}
