// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AuthError, HashingError, TokenError};
use crate::storage::StorageError;

/// Error class, carried in the response body as `error.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Authentication,
    Authorization,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authentication | ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Vec<String>,
}

/// Error response body: `{"error": {"kind", "message", "details"?}}`.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Message shared by every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Validation failure listing every broken rule.
    pub fn validation(details: Vec<String>) -> Self {
        Self::new(ErrorKind::Validation, "Validation failed").with_details(details)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// The failed-login response; identical for unknown user and wrong password.
    pub fn invalid_credentials() -> Self {
        Self::unauthenticated(INVALID_CREDENTIALS)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: ErrorDetail {
                kind: self.kind,
                message: self.message,
                details: self.details,
            },
        });
        (status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(entity) => ApiError::not_found(format!("{entity} not found")),
            StorageError::AlreadyExists(_) => ApiError::conflict("Username is unavailable"),
            StorageError::PermissionDenied {
                user_id,
                resource,
                resource_id,
            } => {
                tracing::warn!(%user_id, resource, %resource_id, "Ownership check failed");
                ApiError::forbidden(format!("Only the author may modify this {resource}"))
            }
            StorageError::Timeout(_) => {
                ApiError::unavailable("Storage is not responding, try again later")
            }
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::internal("Internal storage error")
            }
        }
    }
}

impl From<HashingError> for ApiError {
    fn from(err: HashingError) -> Self {
        match err {
            HashingError::Timeout(_) => {
                ApiError::unavailable("Credential check is not responding, try again later")
            }
            other => {
                tracing::error!(error = %other, "Password hashing failure");
                ApiError::internal("Internal credential error")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!(error = %err, "Token issuance failure");
        ApiError::internal("Could not issue session token")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unavailable(_) => {
                ApiError::unavailable("Authentication is not responding, try again later")
            }
            AuthError::InternalError(msg) => {
                tracing::error!(error = %msg, "Authentication failure");
                ApiError::internal("Internal authentication error")
            }
            credential => ApiError::unauthenticated(credential.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
