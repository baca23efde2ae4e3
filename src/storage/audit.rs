// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for security-sensitive operations.
//!
//! Registrations, logins, permission denials and every blog/comment
//! mutation are appended to the `audit_events` table. Keys are
//! `YYYY-MM-DD/micros/event_id`, so one day's events form a contiguous,
//! time-ordered key range.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::database::{BlogDatabase, StorageResult, AUDIT_EVENTS};

/// Types of auditable events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Account events
    UserRegistered,

    // Auth events
    LoginSucceeded,
    LoginFailed,
    TokenRefreshed,
    PermissionDenied,

    // Blog events
    BlogCreated,
    BlogUpdated,
    BlogDeleted,

    // Comment events
    CommentCreated,
    CommentUpdated,
    CommentDeleted,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// User who triggered the event (if known).
    pub user_id: Option<String>,
    /// Resource affected (blog_id, comment_id, etc.).
    pub resource_id: Option<String>,
    /// Resource type (blog, comment, user).
    pub resource_type: Option<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            resource_id: None,
            resource_type: None,
            success: true,
            error: None,
        }
    }

    /// Set the user ID.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the resource.
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Mark as failed with error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    fn storage_key(&self) -> String {
        format!(
            "{}/{:020}/{}",
            self.timestamp.format("%Y-%m-%d"),
            self.timestamp.timestamp_micros(),
            self.event_id
        )
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    db: &'a BlogDatabase,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self { db }
    }

    /// Append an audit event.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        self.db.put_document(AUDIT_EVENTS, &event.storage_key(), event)
    }

    /// Read audit events for a specific date (`YYYY-MM-DD`), oldest first.
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let start = format!("{date}/");
        // '0' sorts directly after '/', bounding the day's key range
        let end = format!("{date}0");

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUDIT_EVENTS)?;

        let mut events = Vec::new();
        for entry in table.range(start.as_str()..end.as_str())? {
            let (_, value) = entry?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    /// Events recorded against one resource on `date`.
    #[cfg(test)]
    pub(crate) fn search_by_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
        date: &str,
    ) -> StorageResult<Vec<AuditEvent>> {
        let events = self.read_events(date)?;
        Ok(events
            .into_iter()
            .filter(|e| {
                e.resource_type.as_deref() == Some(resource_type)
                    && e.resource_id.as_deref() == Some(resource_id)
            })
            .collect())
    }
}

/// Helper macro for recording audit events from async handlers.
///
/// Expands to `AppState::audit`, which never fails the request.
#[macro_export]
macro_rules! audit_log {
    ($state:expr, $event_type:expr, $user_id:expr) => {{
        let event = $crate::storage::AuditEvent::new($event_type).with_user($user_id);
        $state.audit(event).await;
    }};
    ($state:expr, $event_type:expr, $user_id:expr, $resource_type:expr, $resource_id:expr) => {{
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user($user_id)
            .with_resource($resource_type, $resource_id);
        $state.audit(event).await;
    }};
}
