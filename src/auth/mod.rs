// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential handling and the session token model for the Blog API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/signup` stores a bcrypt digest of the password
//! 2. `POST /api/login` verifies the password and issues an HS256 token
//!    carrying `sub` (user id), `username`, `iat` and `exp`
//! 3. Protected routes require `Authorization: Bearer <token>`:
//!    - signature and expiry are verified with the server secret
//!    - the subject is looked up so tokens of removed users stop working
//!    - the identity is attached to the request for ownership checks
//!
//! ## Security
//!
//! - Tokens are stateless; they end by expiry or by rotating the secret
//! - Unknown-user and wrong-password logins get identical responses
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use password::{HashingError, PasswordHasher};
pub use token::{IssuedToken, TokenError, TokenIssuer, VerificationError};
