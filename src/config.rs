// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! typed [`AppConfig`] loaded from the environment at startup. A `.env` file
//! in the working directory is read first (see `main.rs`).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `blog.redb` | `./data` |
//! | `ACCESS_TOKEN_SECRET` | HMAC secret for session tokens (≥ 32 bytes) | Required |
//! | `TOKEN_TTL_SECS` | Session token lifetime | `3600` |
//! | `BCRYPT_COST` | bcrypt work factor (4..=31) | `10` |
//! | `HASH_TIMEOUT_MS` | Bound on one hash or verify | `5000` |
//! | `STORE_TIMEOUT_MS` | Bound on one store call | `2000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::password::{MAX_COST, MIN_COST};
use crate::auth::token::MIN_SECRET_LEN;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory.
///
/// The redb file `blog.redb` is created inside it on first start.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// Rotating this value invalidates every outstanding session token.
pub const ACCESS_TOKEN_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

pub const TOKEN_TTL_SECS_ENV: &str = "TOKEN_TTL_SECS";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const HASH_TIMEOUT_MS_ENV: &str = "HASH_TIMEOUT_MS";
pub const STORE_TIMEOUT_MS_ENV: &str = "STORE_TIMEOUT_MS";

/// Environment variable name for log output format.
///
/// Values: `json` (structured, for production) or `pretty` (human-readable)
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_HASH_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Name of the database file inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "blog.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Validated startup configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub hash_timeout: Duration,
    pub store_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret =
            lookup(ACCESS_TOKEN_SECRET_ENV).ok_or(ConfigError::Missing(ACCESS_TOKEN_SECRET_ENV))?;
        if token_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: ACCESS_TOKEN_SECRET_ENV,
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }

        let bcrypt_cost = parse_or(&lookup, BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: BCRYPT_COST_ENV,
                reason: format!("must be within {MIN_COST}..={MAX_COST}"),
            });
        }

        let token_ttl_secs: u64 = parse_or(&lookup, TOKEN_TTL_SECS_ENV, DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: TOKEN_TTL_SECS_ENV,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?,
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            token_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            bcrypt_cost,
            hash_timeout: Duration::from_millis(parse_or(
                &lookup,
                HASH_TIMEOUT_MS_ENV,
                DEFAULT_HASH_TIMEOUT_MS,
            )?),
            store_timeout: Duration::from_millis(parse_or(
                &lookup,
                STORE_TIMEOUT_MS_ENV,
                DEFAULT_STORE_TIMEOUT_MS,
            )?),
            log_format: parse_or(&lookup, LOG_FORMAT_ENV, LogFormat::default())?,
        })
    }

    /// Socket address to bind the listener to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("hash_timeout", &self.hash_timeout)
            .field("store_timeout", &self.store_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
