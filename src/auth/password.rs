// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with bcrypt.
//!
//! bcrypt reads at most 72 bytes of input, so every plaintext is first
//! reduced to the base64 form of its SHA-256 digest (44 bytes) and only that
//! is handed to bcrypt. Every byte of the password therefore counts.
//!
//! bcrypt is CPU-bound, so the async wrappers move each call onto the
//! blocking pool and bound it with a timeout.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

/// Lowest bcrypt work factor accepted.
pub const MIN_COST: u32 = 4;
/// Highest bcrypt work factor accepted.
pub const MAX_COST: u32 = 31;

/// Plaintext checked against the dummy digest on unknown-user logins.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

#[derive(Debug, Clone, thiserror::Error)]
pub enum HashingError {
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("hashing failed: {0}")]
    Internal(String),

    #[error("hashing exceeded {0:?}")]
    Timeout(Duration),
}

fn prehash(plaintext: &str) -> String {
    STANDARD.encode(Sha256::digest(plaintext.as_bytes()))
}

/// Hash a password with a fresh salt.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, HashingError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(HashingError::InvalidCost(cost));
    }
    bcrypt::hash(prehash(plaintext), cost).map_err(|e| HashingError::Internal(e.to_string()))
}

/// Check a password against a stored digest.
///
/// A malformed digest yields `false` rather than an error.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(prehash(plaintext), digest).unwrap_or(false)
}

/// Async password hasher with a fixed work factor.
pub struct PasswordHasher {
    cost: u32,
    timeout: Duration,
    dummy_digest: String,
}

impl PasswordHasher {
    /// # Errors
    /// Returns `HashingError::InvalidCost` if `cost` is outside 4..=31.
    pub fn new(cost: u32, timeout: Duration) -> Result<Self, HashingError> {
        let dummy_digest = hash_password(DUMMY_PASSWORD, cost)?;
        Ok(Self {
            cost,
            timeout,
            dummy_digest,
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;
        self.run(move || hash_password(&plaintext, cost)).await
    }

    pub async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashingError> {
        let plaintext = plaintext.to_string();
        let digest = digest.to_string();
        self.run(move || Ok(verify_password(&plaintext, &digest))).await
    }

    /// Spend one verification's worth of work without a real digest.
    ///
    /// Called when a login names an unknown user so both failure paths cost
    /// the same.
    pub async fn verify_dummy(&self, plaintext: &str) -> Result<(), HashingError> {
        self.verify(plaintext, &self.dummy_digest).await.map(|_| ())
    }

    async fn run<T, F>(&self, op: F) -> Result<T, HashingError>
    where
        F: FnOnce() -> Result<T, HashingError> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(op);
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(HashingError::Internal(join_error.to_string())),
            Err(_) => Err(HashingError::Timeout(self.timeout)),
        }
    }
}
