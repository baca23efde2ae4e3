// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Layered with `route_layer` on every fully protected route group:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users/me", get(get_current_user))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_auth,
//!     ));
//! ```
//!
//! On success the [`AuthenticatedUser`](super::AuthenticatedUser) is placed
//! in the request extensions, where the `Auth` extractor picks it up. On
//! failure the request is answered here and no handler runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::authenticate;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", user.user_id.as_str());
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            if e.is_credential_failure() {
                tracing::debug!(
                    error_code = e.error_code(),
                    path = %request.uri().path(),
                    "Rejected unauthenticated request"
                );
            } else {
                tracing::warn!(error = %e, "Authentication could not complete");
            }
            e.into_response()
        }
    }
}
