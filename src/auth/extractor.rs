// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::{StorageError, UserRepository};

/// Extractor for authenticated users.
///
/// Reuses the identity attached by [`super::middleware::require_auth`] when
/// the route sits behind it, and otherwise verifies the `Authorization`
/// header itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_blog(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<BlogResponse>, ApiError> {
///     // user.user_id becomes the blog's author
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate(&parts.headers, state).await?;
        Ok(Auth(user))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let mut parts = auth_header.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if scheme != "Bearer" || token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Verify the bearer token and confirm its subject still exists.
pub async fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.verify(token)?;

    let user_id = claims.sub.clone();
    let stored = state
        .with_db(move |db| UserRepository::new(db).find_by_id(&user_id))
        .await
        .map_err(|e| match e {
            StorageError::Timeout(_) => AuthError::Unavailable(e.to_string()),
            other => AuthError::InternalError(other.to_string()),
        })?
        .ok_or(AuthError::UnknownUser)?;

    let mut user = AuthenticatedUser::from_claims(claims);
    user.username = stored.username;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use crate::storage::StoredUser;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn register(state: &AppState, username: &str) -> StoredUser {
        UserRepository::new(&state.db)
            .insert(StoredUser::new(username, "$2b$04$not-a-real-digest"))
            .unwrap()
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with_auth(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_other_schemes() {
        let (state, _temp_dir) = test_state();

        for value in ["Basic abc", "bearer abc", "Bearer", "Bearer    ", "abc"] {
            let mut parts = parts_with_auth(Some(value));
            let result = Auth::from_request_parts(&mut parts, &state).await;
            assert!(
                matches!(result, Err(AuthError::InvalidAuthHeader)),
                "{value:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_valid_token() {
        let (state, _temp_dir) = test_state();
        let user = register(&state, "alice01");
        let issued = state.tokens.issue(&user.id, &user.username).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", issued.token)));

        let Auth(authenticated) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.username, "alice01");
        assert_eq!(authenticated.expires_at, issued.expires_at);
    }

    #[tokio::test]
    async fn token_for_missing_user_is_rejected() {
        let (state, _temp_dir) = test_state();
        let issued = state.tokens.issue("ghost-id", "ghost").unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", issued.token)));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with_auth(Some("Bearer garbage"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _temp_dir) = test_state();
        // If middleware already set the user, use that
        let mut parts = parts_with_auth(None);

        let user = AuthenticatedUser {
            user_id: "user_from_middleware".to_string(),
            username: "mw".to_string(),
            issued_at: 0,
            expires_at: 0,
        };
        parts.extensions.insert(user);

        let Auth(authenticated) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(authenticated.user_id, "user_from_middleware");
    }
}
