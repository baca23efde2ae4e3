// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blog endpoints.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{parse_id, storage_failure};
use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{
        BlogListResponse, BlogMutationResponse, BlogRequest, BlogResponse, BlogSummary, BlogView,
        CommentView, MessageResponse, UserSummary,
    },
    state::AppState,
    storage::{
        AuditEventType, BlogDatabase, BlogRepository, CommentRepository, OwnershipEnforcer,
        StorageError, StorageResult, StoredBlog, UserRepository,
    },
};

/// Username shown for an author whose account no longer exists.
const MISSING_AUTHOR: &str = "[deleted]";

/// Resolves author ids to public summaries, caching each lookup.
pub(crate) struct AuthorCache<'a> {
    users: UserRepository<'a>,
    cache: HashMap<String, UserSummary>,
}

impl<'a> AuthorCache<'a> {
    pub(crate) fn new(db: &'a BlogDatabase) -> Self {
        Self {
            users: UserRepository::new(db),
            cache: HashMap::new(),
        }
    }

    pub(crate) fn get(&mut self, author_id: &str) -> StorageResult<UserSummary> {
        if let Some(summary) = self.cache.get(author_id) {
            return Ok(summary.clone());
        }
        let summary = match self.users.find_by_id(author_id)? {
            Some(user) => UserSummary::from(&user),
            None => UserSummary {
                id: author_id.to_string(),
                username: MISSING_AUTHOR.to_string(),
            },
        };
        self.cache.insert(author_id.to_string(), summary.clone());
        Ok(summary)
    }
}

/// Populate a blog's author and comments.
pub(crate) fn blog_view(db: &BlogDatabase, blog: StoredBlog) -> StorageResult<BlogView> {
    let mut authors = AuthorCache::new(db);
    let author = authors.get(&blog.author_id)?;

    let comments = CommentRepository::new(db)
        .find_many(&blog.comment_ids)?
        .into_iter()
        .map(|comment| {
            let author = authors.get(&comment.author_id)?;
            Ok(CommentView::new(comment, author))
        })
        .collect::<StorageResult<Vec<_>>>()?;

    Ok(BlogView::new(blog, author, comments))
}

/// List every blog with its author. Public.
#[utoipa::path(
    get,
    path = "/api/blog",
    tag = "Blogs",
    responses(
        (status = 200, description = "All blogs, oldest first", body = BlogListResponse),
    )
)]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<BlogListResponse>, ApiError> {
    let blogs = state
        .with_db(|db| {
            let mut authors = AuthorCache::new(db);
            BlogRepository::new(db)
                .list()?
                .into_iter()
                .map(|blog| {
                    Ok(BlogSummary {
                        author: authors.get(&blog.author_id)?,
                        id: blog.id,
                        title: blog.title,
                        body: blog.body,
                    })
                })
                .collect::<StorageResult<Vec<_>>>()
        })
        .await?;

    Ok(Json(BlogListResponse { blogs }))
}

/// Publish a new blog authored by the caller.
#[utoipa::path(
    post,
    path = "/api/blog",
    tag = "Blogs",
    security(("bearer" = [])),
    request_body = BlogRequest,
    responses(
        (status = 201, description = "Blog posted", body = BlogMutationResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    Auth(user): Auth,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogMutationResponse>), ApiError> {
    let Json(request) = payload?;
    let valid = request
        .validate(state.sanitizer.as_ref())
        .map_err(ApiError::validation)?;

    let blog = StoredBlog::new(&user.user_id, valid.title, valid.body);
    let blog_id = blog.id.clone();
    let view = state
        .with_db(move |db| {
            BlogRepository::new(db).save(&blog)?;
            blog_view(db, blog)
        })
        .await?;

    tracing::info!(user_id = %user.user_id, %blog_id, "Blog created");
    audit_log!(state, AuditEventType::BlogCreated, user.user_id, "blog", blog_id);

    Ok((
        StatusCode::CREATED,
        Json(BlogMutationResponse {
            msg: "Blog posted.".to_string(),
            blog: view,
        }),
    ))
}

/// Get a blog with its author and comments.
#[utoipa::path(
    get,
    path = "/api/blog/{id}",
    tag = "Blogs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 403, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
        (status = 404, description = "Blog not found", body = crate::error::ErrorBody),
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Auth(_user): Auth,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog_id = parse_id(&id, "Blog")?;

    let view = state
        .with_db(move |db| match BlogRepository::new(db).find_by_id(&blog_id)? {
            Some(blog) => blog_view(db, blog).map(Some),
            None => Ok(None),
        })
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;

    Ok(Json(BlogResponse { blog: view }))
}

/// Update a blog's title and body. Author only.
#[utoipa::path(
    put,
    path = "/api/blog/{id}",
    tag = "Blogs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Blog ID")),
    request_body = BlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = BlogMutationResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorBody),
        (status = 403, description = "Not authenticated, or not the author", body = crate::error::ErrorBody),
        (status = 404, description = "Blog not found", body = crate::error::ErrorBody),
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> Result<Json<BlogMutationResponse>, ApiError> {
    let Json(request) = payload?;
    let valid = request
        .validate(state.sanitizer.as_ref())
        .map_err(ApiError::validation)?;
    let blog_id = parse_id(&id, "Blog")?;

    let actor = user.clone();
    let result = state
        .with_db(move |db| {
            let blog = BlogRepository::new(db).update(&blog_id, |blog| {
                blog.verify_ownership(&actor)?;
                blog.title = valid.title;
                blog.body = valid.body;
                blog.updated_at = Some(Utc::now());
                Ok(())
            })?;
            blog_view(db, blog)
        })
        .await;

    let view = match result {
        Ok(view) => view,
        Err(e) => return Err(storage_failure(&state, &user, e).await),
    };

    tracing::info!(user_id = %user.user_id, blog_id = %view.id, "Blog updated");
    audit_log!(state, AuditEventType::BlogUpdated, user.user_id, "blog", view.id.clone());

    Ok(Json(BlogMutationResponse {
        msg: "Blog updated.".to_string(),
        blog: view,
    }))
}

/// Delete a blog and every comment on it. Author only.
#[utoipa::path(
    delete,
    path = "/api/blog/{id}",
    tag = "Blogs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog deleted", body = MessageResponse),
        (status = 403, description = "Not authenticated, or not the author", body = crate::error::ErrorBody),
        (status = 404, description = "Blog not found", body = crate::error::ErrorBody),
    )
)]
pub async fn delete_blog(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let blog_id = parse_id(&id, "Blog")?;

    let actor = user.clone();
    let target = blog_id.clone();
    let result = state
        .with_db(move |db| {
            let repo = BlogRepository::new(db);
            let blog = repo
                .find_by_id(&target)?
                .ok_or_else(|| StorageError::not_found("Blog"))?;
            blog.verify_ownership(&actor)?;

            repo.delete_with_comments(&target)?
                .ok_or_else(|| StorageError::not_found("Blog"))
        })
        .await;

    let removed_comments = match result {
        Ok(count) => count,
        Err(e) => return Err(storage_failure(&state, &user, e).await),
    };

    tracing::info!(user_id = %user.user_id, %blog_id, removed_comments, "Blog deleted");
    audit_log!(state, AuditEventType::BlogDeleted, user.user_id, "blog", blog_id);

    Ok(Json(MessageResponse::new("Blog deleted.")))
}
