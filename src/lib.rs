// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blog API Server - Blogging REST backend
//!
//! Users register and log in, publish blog posts and comment on them.
//! Every mutating route is gated by a signed session token, and updates or
//! deletes are checked against the resource's recorded author.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the authorization gate
//! - `storage` - Embedded document store (redb), ownership checks, audit trail
//! - `config` - Environment-driven configuration
//! - `sanitize` - HTML sanitization of user content

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sanitize;
pub mod state;
pub mod storage;
