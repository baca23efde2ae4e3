// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login and token refresh.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, SignupRequest, SignupResponse, UserSummary,
        USERNAME_MAX_CHARS, USERNAME_MIN_CHARS,
    },
    state::AppState,
    storage::{AuditEvent, AuditEventType, StoredUser, UserRepository},
};

/// Register a new account.
///
/// Validation runs first and stops the request on any failure. The username
/// index is checked again inside the insert transaction, so a concurrent
/// duplicate still gets 409.
///
/// If the insert outlives the store timeout the caller gets 503, but the
/// account may still be created; a retry then gets 409.
#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "Accounts",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 409, description = "Username is unavailable", body = crate::error::ErrorBody),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let Json(request) = payload?;
    let valid = request.validate().map_err(ApiError::validation)?;

    let lookup = valid.username.clone();
    let existing = state
        .with_db(move |db| UserRepository::new(db).find_by_username(&lookup))
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("Username is unavailable"));
    }

    let digest = state.hasher.hash(&valid.password).await?;
    let user = state
        .with_db(move |db| UserRepository::new(db).insert(StoredUser::new(valid.username, digest)))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    audit_log!(state, AuditEventType::UserRegistered, user.id.clone(), "user", user.id.clone());

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            msg: "Successfully registered".to_string(),
            user: UserSummary::from(&user),
        }),
    ))
}

/// Log in and receive a session token.
///
/// Unknown usernames and wrong passwords produce the same response, and both
/// paths run one bcrypt verification.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Request body is not valid JSON", body = crate::error::ErrorBody),
        (status = 403, description = "Invalid username or password", body = crate::error::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let username = request.username.trim().to_string();

    // A username that could never have been registered is neither looked up
    // nor recorded in the audit event; the response stays the same.
    let plausible = (USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS)
        .contains(&username.chars().count());
    let found = if plausible {
        let lookup = username.clone();
        state
            .with_db(move |db| UserRepository::new(db).find_by_username(&lookup))
            .await?
    } else {
        None
    };

    let verified = match &found {
        Some(user) => {
            state
                .hasher
                .verify(&request.password, &user.password_hash)
                .await?
        }
        None => {
            state.hasher.verify_dummy(&request.password).await?;
            false
        }
    };

    let user = match found {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Login rejected");
            let mut event = AuditEvent::new(AuditEventType::LoginFailed);
            if plausible {
                event = event.with_resource("username", username);
            }
            state.audit(event.failed("invalid credentials")).await;
            return Err(ApiError::invalid_credentials());
        }
    };

    let issued = state.tokens.issue(&user.id, &user.username)?;

    tracing::info!(user_id = %user.id, "User logged in");
    audit_log!(state, AuditEventType::LoginSucceeded, user.id.clone());

    Ok(Json(LoginResponse::bearer(
        issued.token,
        issued.expires_at,
        UserSummary::from(&user),
    )))
}

/// Exchange a still-valid token for a fresh one.
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "New token issued", body = LoginResponse),
        (status = 403, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state.tokens.issue(&user.user_id, &user.username)?;

    tracing::debug!(user_id = %user.user_id, "Token refreshed");
    audit_log!(state, AuditEventType::TokenRefreshed, user.user_id.clone());

    Ok(Json(LoginResponse::bearer(
        issued.token,
        issued.expires_at,
        UserSummary {
            id: user.user_id,
            username: user.username,
        },
    )))
}
