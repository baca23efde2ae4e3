// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};

use super::token::VerificationError;
use crate::error::ApiError;

/// Authentication error type.
///
/// Every credential failure is reported as HTTP 403 with kind
/// `authentication`; the variant is kept for logs.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not text, scheme is not `Bearer`, or the token part is missing
    InvalidAuthHeader,
    /// Token is malformed
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token names a user that no longer exists
    UnknownUser,
    /// The user lookup timed out
    Unavailable(String),
    /// Internal error
    InternalError(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownUser => "unknown_user",
            AuthError::Unavailable(_) => "unavailable",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// True for failures caused by the presented credentials.
    pub fn is_credential_failure(&self) -> bool {
        !matches!(self, AuthError::Unavailable(_) | AuthError::InternalError(_))
    }
}

impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Malformed => AuthError::MalformedToken,
            VerificationError::BadSignature => AuthError::InvalidSignature,
            VerificationError::Expired => AuthError::TokenExpired,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::UnknownUser => write!(f, "Token does not belong to an active user"),
            AuthError::Unavailable(msg) => write!(f, "Authentication unavailable: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
