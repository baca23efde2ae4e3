// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::config::DEFAULT_STORE_TIMEOUT_MS;
use crate::sanitize::{AmmoniaSanitizer, Sanitizer};
use crate::storage::{run_blocking, AuditEvent, AuditRepository, BlogDatabase, StorageResult};

/// Shared state handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<BlogDatabase>,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: Arc<PasswordHasher>,
    pub sanitizer: Arc<dyn Sanitizer>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(db: BlogDatabase, tokens: TokenIssuer, hasher: PasswordHasher) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            sanitizer: Arc::new(AmmoniaSanitizer),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Run a repository operation off the async runtime, bounded by the store timeout.
    pub async fn with_db<T, F>(&self, op: F) -> StorageResult<T>
    where
        F: FnOnce(&BlogDatabase) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(self.db.clone(), self.store_timeout, op).await
    }

    /// Append an audit event. Failures are logged and never fail the request.
    pub async fn audit(&self, event: AuditEvent) {
        let event_type = event.event_type;
        if let Err(e) = self
            .with_db(move |db| AuditRepository::new(db).log(&event))
            .await
        {
            tracing::warn!(error = %e, ?event_type, "Failed to write audit event");
        }
    }
}

/// Fresh state over a temporary database, for tests.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let db = BlogDatabase::open(&temp_dir.path().join("blog.redb")).expect("Failed to open db");
    let tokens = TokenIssuer::new(
        b"test-secret-that-is-at-least-32-bytes-long",
        Duration::from_secs(3600),
    )
    .expect("Failed to build token issuer");
    let hasher = PasswordHasher::new(crate::auth::password::MIN_COST, Duration::from_secs(10))
        .expect("Failed to build hasher");

    (AppState::new(db, tokens, hasher), temp_dir)
}
