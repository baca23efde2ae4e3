// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a session token.
///
/// The token is a snapshot of the identity at login time; the gate still
/// checks that `sub` names an existing user before trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username at issuance
    pub username: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the primary type used throughout the application to represent
/// the user making a request. It lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim)
    pub user_id: String,

    pub username: String,

    /// Token issuance time (Unix seconds)
    #[serde(skip)]
    pub issued_at: i64,

    /// Token expiration (Unix seconds)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims {
            sub: "user_123".to_string(),
            username: "alice01".to_string(),
            iat: 1700000000,
            exp: 1700003600,
            jti: "jti-1".to_string(),
        }
    }

    #[test]
    fn from_claims_extracts_identity() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.username, "alice01");
        assert_eq!(user.issued_at, 1700000000);
        assert_eq!(user.expires_at, 1700003600);
    }

    #[test]
    fn serialized_user_omits_token_times() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["user_id"], "user_123");
        assert!(json.get("expires_at").is_none());
        assert!(json.get("issued_at").is_none());
    }
}
