// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{blogs::AuthorCache, parse_id, storage_failure};
use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{CommentMutationResponse, CommentRequest, CommentView, MessageResponse},
    state::AppState,
    storage::{
        verify_comment_removal, AuditEventType, BlogDatabase, BlogRepository, CommentRepository,
        OwnershipEnforcer, StorageError, StorageResult, StoredBlog, StoredComment,
    },
};

/// Load a blog and one of its comments, or NotFound for either.
fn load_pair(
    db: &BlogDatabase,
    blog_id: &str,
    comment_id: &str,
) -> StorageResult<(StoredBlog, StoredComment)> {
    let blog = BlogRepository::new(db)
        .find_by_id(blog_id)?
        .ok_or_else(|| StorageError::not_found("Blog"))?;
    let comment = CommentRepository::new(db)
        .find_by_id(comment_id)?
        .filter(|comment| comment.blog_id == blog.id)
        .ok_or_else(|| StorageError::not_found("Comment"))?;
    Ok((blog, comment))
}

/// Add a comment to a blog.
#[utoipa::path(
    post,
    path = "/api/blog/{id}",
    tag = "Comments",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Blog ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment posted", body = CommentMutationResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
        (status = 404, description = "Blog not found", body = crate::error::ErrorBody),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentMutationResponse>), ApiError> {
    let Json(request) = payload?;
    let content = request
        .validate(state.sanitizer.as_ref())
        .map_err(ApiError::validation)?;
    let blog_id = parse_id(&id, "Blog")?;

    let comment = StoredComment::new(blog_id, &user.user_id, content);
    let view = state
        .with_db(move |db| {
            BlogRepository::new(db).attach_comment(&comment)?;
            let author = AuthorCache::new(db).get(&comment.author_id)?;
            Ok(CommentView::new(comment, author))
        })
        .await?;

    tracing::info!(user_id = %user.user_id, blog_id = %view.blog_id, comment_id = %view.id, "Comment created");
    audit_log!(state, AuditEventType::CommentCreated, user.user_id, "comment", view.id.clone());

    Ok((
        StatusCode::CREATED,
        Json(CommentMutationResponse {
            msg: "Comment posted.".to_string(),
            comment: view,
        }),
    ))
}

/// Edit a comment. Comment author only.
#[utoipa::path(
    put,
    path = "/api/blog/{blogid}/comment/{id}",
    tag = "Comments",
    security(("bearer" = [])),
    params(
        ("blogid" = String, Path, description = "Blog ID"),
        ("id" = String, Path, description = "Comment ID"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentMutationResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Not authenticated, or not the comment author", body = crate::error::ErrorBody),
        (status = 404, description = "Blog or comment not found", body = crate::error::ErrorBody),
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((blog_id, comment_id)): Path<(String, String)>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentMutationResponse>, ApiError> {
    let Json(request) = payload?;
    let content = request
        .validate(state.sanitizer.as_ref())
        .map_err(ApiError::validation)?;
    let blog_id = parse_id(&blog_id, "Blog")?;
    let comment_id = parse_id(&comment_id, "Comment")?;

    let actor = user.clone();
    let result = state
        .with_db(move |db| {
            let comment = CommentRepository::new(db).update(&blog_id, &comment_id, |comment| {
                comment.verify_ownership(&actor)?;
                comment.content = content;
                comment.updated_at = Some(Utc::now());
                Ok(())
            })?;

            let author = AuthorCache::new(db).get(&comment.author_id)?;
            Ok(CommentView::new(comment, author))
        })
        .await;

    let view = match result {
        Ok(view) => view,
        Err(e) => return Err(storage_failure(&state, &user, e).await),
    };

    tracing::info!(user_id = %user.user_id, comment_id = %view.id, "Comment updated");
    audit_log!(state, AuditEventType::CommentUpdated, user.user_id, "comment", view.id.clone());

    Ok(Json(CommentMutationResponse {
        msg: "Comment updated.".to_string(),
        comment: view,
    }))
}

/// Delete a comment. Allowed for the comment author and the blog author.
#[utoipa::path(
    delete,
    path = "/api/blog/{blogid}/comment/{id}",
    tag = "Comments",
    security(("bearer" = [])),
    params(
        ("blogid" = String, Path, description = "Blog ID"),
        ("id" = String, Path, description = "Comment ID"),
    ),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Not authenticated, or neither comment nor blog author", body = crate::error::ErrorBody),
        (status = 404, description = "Blog or comment not found", body = crate::error::ErrorBody),
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((blog_id, comment_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let blog_id = parse_id(&blog_id, "Blog")?;
    let comment_id = parse_id(&comment_id, "Comment")?;

    let actor = user.clone();
    let target = comment_id.clone();
    let result = state
        .with_db(move |db| {
            let (blog, comment) = load_pair(db, &blog_id, &target)?;
            verify_comment_removal(&comment, &blog, &actor)?;

            BlogRepository::new(db).detach_comment(&blog.id, &comment.id)
        })
        .await;

    if let Err(e) = result {
        return Err(storage_failure(&state, &user, e).await);
    }

    tracing::info!(user_id = %user.user_id, %comment_id, "Comment deleted");
    audit_log!(state, AuditEventType::CommentDeleted, user.user_id, "comment", comment_id);

    Ok(Json(MessageResponse::new("Comment deleted.")))
}
