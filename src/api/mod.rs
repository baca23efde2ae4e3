// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, AuthenticatedUser},
    error::{ApiError, ErrorBody, ErrorDetail, ErrorKind},
    models::{
        BlogListResponse, BlogMutationResponse, BlogRequest, BlogResponse, BlogSummary, BlogView,
        CommentMutationResponse, CommentRequest, CommentView, LoginRequest, LoginResponse,
        MessageResponse, SignupRequest, SignupResponse, UserSummary,
    },
    state::AppState,
    storage::{AuditEvent, AuditEventType, StorageError},
};

pub mod auth;
pub mod blogs;
pub mod comments;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // POST /blog authenticates through the `Auth` extractor because GET /blog is public
    let public_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/blog", get(blogs::list_blogs).post(blogs::create_blog));

    let protected_routes = Router::new()
        .route("/token/refresh", post(auth::refresh_token))
        .route("/users/me", get(users::get_current_user))
        .route(
            "/blog/{id}",
            get(blogs::get_blog)
                .post(comments::add_comment)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route(
            "/blog/{blogid}/comment/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api_routes = public_routes.merge(protected_routes).with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                        user_id = tracing::field::Empty,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

/// Normalize a path id, reporting anything that is not a UUID as missing.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<String, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ApiError::not_found(format!("{entity} not found")))
}

/// Convert a storage failure from a mutation, auditing ownership denials.
pub(crate) async fn storage_failure(
    state: &AppState,
    user: &AuthenticatedUser,
    err: StorageError,
) -> ApiError {
    if let StorageError::PermissionDenied {
        resource,
        resource_id,
        ..
    } = &err
    {
        let event = AuditEvent::new(AuditEventType::PermissionDenied)
            .with_user(user.user_id.clone())
            .with_resource(*resource, resource_id.clone())
            .failed("not the author");
        state.audit(event).await;
    }
    ApiError::from(err)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        auth::refresh_token,
        users::get_current_user,
        blogs::list_blogs,
        blogs::create_blog,
        blogs::get_blog,
        blogs::update_blog,
        blogs::delete_blog,
        comments::add_comment,
        comments::update_comment,
        comments::delete_comment,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignupRequest,
            SignupResponse,
            LoginRequest,
            LoginResponse,
            UserSummary,
            BlogRequest,
            BlogSummary,
            BlogView,
            BlogListResponse,
            BlogResponse,
            BlogMutationResponse,
            CommentRequest,
            CommentView,
            CommentMutationResponse,
            MessageResponse,
            ErrorBody,
            ErrorDetail,
            ErrorKind,
            users::UserMeResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Registration, login and session tokens"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Blogs", description = "Blog posts"),
        (name = "Comments", description = "Comments on blog posts"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use crate::storage::{AuditRepository, BlogRepository, CommentRepository};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        _temp: TempDir,
    }

    impl TestApp {
        fn new() -> Self {
            let (state, temp) = test_state();
            Self { state, _temp: temp }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("Authorization", format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = router(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }

        async fn signup(&self, username: &str, password: &str) -> (StatusCode, Value) {
            self.send(
                Method::POST,
                "/api/signup",
                None,
                Some(json!({"username": username, "password": password, "repassword": password})),
            )
            .await
        }

        async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
            self.send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": username, "password": password})),
            )
            .await
        }

        /// Register and log in, returning the access token.
        async fn user_token(&self, username: &str) -> String {
            let (status, _) = self.signup(username, "longpassword1").await;
            assert_eq!(status, StatusCode::CREATED);
            let (status, body) = self.login(username, "longpassword1").await;
            assert_eq!(status, StatusCode::OK);
            body["accessToken"].as_str().unwrap().to_string()
        }

        async fn create_blog(&self, token: &str, title: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/blog",
                    Some(token),
                    Some(json!({"title": title, "body": "<p>body</p>"})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["blog"]["id"].as_str().unwrap().to_string()
        }

        async fn add_comment(&self, token: &str, blog_id: &str, content: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    &format!("/api/blog/{blog_id}"),
                    Some(token),
                    Some(json!({"content": content})),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
            body["comment"]["id"].as_str().unwrap().to_string()
        }
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = TestApp::new();
        // Ensure the router can be converted into a service without panicking.
        let _ = router(app.state.clone()).into_make_service();
    }

    #[tokio::test]
    async fn openapi_document_lists_routes_and_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/api/login"].is_object());
        assert!(doc["paths"]["/api/blog/{blogid}/comment/{id}"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }

    #[tokio::test]
    async fn signup_then_login_returns_verifiable_token() {
        let app = TestApp::new();

        let (status, body) = app.signup("alice01", "longpassword1").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "alice01");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = app.login("alice01", "longpassword1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["user"]["username"], "alice01");

        let token = body["accessToken"].as_str().unwrap();
        let claims = app.state.tokens.verify(token).unwrap();
        assert_eq!(claims.sub, body["user"]["id"].as_str().unwrap());
        assert_eq!(claims.exp, body["expiresAt"].as_i64().unwrap());

        let (status, me) = app.send(Method::GET, "/api/users/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "alice01");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let app = TestApp::new();
        app.signup("alice01", "longpassword1").await;

        let wrong_password = app.login("alice01", "wrong").await;
        let unknown_user = app.login("nobody99", "longpassword1").await;

        assert_eq!(wrong_password.0, StatusCode::FORBIDDEN);
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(
            wrong_password.1,
            json!({"error": {"kind": "authentication", "message": "Invalid username or password"}})
        );
    }

    #[tokio::test]
    async fn password_suffix_past_bcrypt_limit_is_checked() {
        let app = TestApp::new();
        let shared = "a".repeat(72);

        let (status, _) = app.signup("alice01", &format!("{shared}REALSECRETSUFFIX")).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app.login("alice01", &format!("{shared}totally-different")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.get("accessToken").is_none());

        let (status, _) = app.login("alice01", &format!("{shared}REALSECRETSUFFIX")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_login_username_is_not_recorded() {
        let app = TestApp::new();
        let huge = "x".repeat(100_000);

        let rejected = app.login(&huge, "longpassword1").await;
        assert_eq!(rejected, app.login("nobody99", "longpassword1").await);
        assert_eq!(rejected.0, StatusCode::FORBIDDEN);

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let failures: Vec<_> = AuditRepository::new(&app.state.db)
            .read_events(&today)
            .unwrap()
            .into_iter()
            .filter(|e| e.event_type == AuditEventType::LoginFailed)
            .collect();
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .all(|e| e.resource_id.as_ref().map_or(0, String::len) <= 30));
        assert_eq!(failures[1].resource_id.as_deref(), Some("nobody99"));
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let app = TestApp::new();
        assert_eq!(app.signup("alice01", "longpassword1").await.0, StatusCode::CREATED);

        let (status, body) = app.signup("alice01", "differentpass").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["kind"], "conflict");

        // The first password still works
        assert_eq!(app.login("alice01", "longpassword1").await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_signup_persists_nothing() {
        let app = TestApp::new();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/signup",
                None,
                Some(json!({"username": "al", "password": "longpassword1", "repassword": "other"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation");
        assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);

        let stored = crate::storage::UserRepository::new(&app.state.db)
            .find_by_username("al")
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = TestApp::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/login")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(app.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_or_bad_tokens() {
        let app = TestApp::new();
        let token = app.user_token("alice01").await;
        let blog_id = app.create_blog(&token, "Hello").await;
        let uri = format!("/api/blog/{blog_id}");

        let (status, body) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["kind"], "authentication");

        let (status, _) = app.send(Method::GET, &uri, Some("garbage"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(Method::POST, "/api/blog", None, Some(json!({"title": "t", "body": "b"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Wrong scheme
        let request = Request::builder()
            .uri(&uri)
            .header("Authorization", format!("Basic {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router(app.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::new();
        app.user_token("alice01").await;
        let user = crate::storage::UserRepository::new(&app.state.db)
            .find_by_username("alice01")
            .unwrap()
            .unwrap();

        let long_ago = chrono::Utc::now().timestamp() - 10 * 3600;
        let expired = app
            .state
            .tokens
            .issue_at(&user.id, &user.username, long_ago)
            .unwrap();

        let (status, body) = app
            .send(Method::GET, "/api/users/me", Some(&expired.token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Token has expired");
    }

    #[tokio::test]
    async fn refresh_issues_new_token() {
        let app = TestApp::new();
        let token = app.user_token("alice01").await;

        let (status, body) = app
            .send(Method::POST, "/api/token/refresh", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let fresh = body["accessToken"].as_str().unwrap();
        assert_ne!(fresh, token);
        let claims = app.state.tokens.verify(fresh).unwrap();
        assert_eq!(claims.username, "alice01");
    }

    #[tokio::test]
    async fn blog_lifecycle_for_author() {
        let app = TestApp::new();
        let token = app.user_token("alice01").await;
        let blog_id = app.create_blog(&token, "First post").await;

        let (status, body) = app.send(Method::GET, "/api/blog", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blogs"][0]["title"], "First post");
        assert_eq!(body["blogs"][0]["author"]["username"], "alice01");
        assert!(body["blogs"][0].get("comments").is_none());

        let uri = format!("/api/blog/{blog_id}");
        let (status, body) = app
            .send(
                Method::PUT,
                &uri,
                Some(&token),
                Some(json!({"title": "Edited", "body": "<p>new</p>"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blog"]["title"], "Edited");

        let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blog"]["body"], "<p>new</p>");

        let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_user_cannot_modify_blog() {
        let app = TestApp::new();
        let alice = app.user_token("alice01").await;
        let bob = app.user_token("bob0001").await;
        let blog_id = app.create_blog(&alice, "Alice's post").await;
        let uri = format!("/api/blog/{blog_id}");

        let (status, body) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["kind"], "authorization");

        let (status, _) = app
            .send(
                Method::PUT,
                &uri,
                Some(&bob),
                Some(json!({"title": "Hijacked", "body": "x"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let stored = BlogRepository::new(&app.state.db)
            .find_by_id(&blog_id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Alice's post");

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let denials = AuditRepository::new(&app.state.db)
            .search_by_resource("blog", &blog_id, &today)
            .unwrap()
            .into_iter()
            .filter(|e| e.event_type == AuditEventType::PermissionDenied)
            .count();
        assert_eq!(denials, 2);
    }

    #[tokio::test]
    async fn comment_edit_is_author_only_and_delete_allows_blog_author() {
        let app = TestApp::new();
        let alice = app.user_token("alice01").await;
        let bob = app.user_token("bob0001").await;
        let carol = app.user_token("carol01").await;

        let blog_id = app.create_blog(&alice, "Alice's post").await;
        let first = app.add_comment(&bob, &blog_id, "bob says hi").await;
        let second = app.add_comment(&bob, &blog_id, "bob again").await;

        let first_uri = format!("/api/blog/{blog_id}/comment/{first}");
        let second_uri = format!("/api/blog/{blog_id}/comment/{second}");
        let edit = Some(json!({"content": "edited"}));

        let stored_content = |id: &str| {
            CommentRepository::new(&app.state.db)
                .find_by_id(id)
                .unwrap()
                .map(|comment| comment.content)
        };

        // Blog author may not edit someone else's comment
        let (status, _) = app.send(Method::PUT, &first_uri, Some(&alice), edit.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(stored_content(&first).as_deref(), Some("bob says hi"));

        let (status, body) = app.send(Method::PUT, &first_uri, Some(&bob), edit).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comment"]["content"], "edited");

        // A bystander can delete nothing
        let (status, _) = app.send(Method::DELETE, &first_uri, Some(&carol), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(stored_content(&first).as_deref(), Some("edited"));
        let blog = BlogRepository::new(&app.state.db)
            .find_by_id(&blog_id)
            .unwrap()
            .unwrap();
        assert_eq!(blog.comment_ids, vec![first.clone(), second.clone()]);

        // Comment author and blog author can both delete
        let (status, _) = app.send(Method::DELETE, &first_uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send(Method::DELETE, &second_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app
            .send(Method::GET, &format!("/api/blog/{blog_id}"), Some(&alice), None)
            .await;
        assert!(body["blog"]["comments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_are_populated_and_scoped_to_their_blog() {
        let app = TestApp::new();
        let alice = app.user_token("alice01").await;
        let bob = app.user_token("bob0001").await;

        let blog_a = app.create_blog(&alice, "A").await;
        let blog_b = app.create_blog(&alice, "B").await;
        let comment = app.add_comment(&bob, &blog_a, "<b>hi</b>").await;

        let (_, body) = app
            .send(Method::GET, &format!("/api/blog/{blog_a}"), Some(&alice), None)
            .await;
        assert_eq!(body["blog"]["author"]["username"], "alice01");
        assert_eq!(body["blog"]["comments"][0]["content"], "<b>hi</b>");
        assert_eq!(body["blog"]["comments"][0]["author"]["username"], "bob0001");

        // Same comment addressed through the wrong blog
        let (status, _) = app
            .send(
                Method::DELETE,
                &format!("/api/blog/{blog_b}/comment/{comment}"),
                Some(&bob),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_blog_removes_its_comments() {
        let app = TestApp::new();
        let alice = app.user_token("alice01").await;
        let bob = app.user_token("bob0001").await;

        let blog_id = app.create_blog(&alice, "Doomed").await;
        let comment_id = app.add_comment(&bob, &blog_id, "soon gone").await;

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/blog/{blog_id}"), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let comment = CommentRepository::new(&app.state.db)
            .find_by_id(&comment_id)
            .unwrap();
        assert!(comment.is_none());
    }

    #[tokio::test]
    async fn malformed_and_missing_ids_are_not_found() {
        let app = TestApp::new();
        let token = app.user_token("alice01").await;

        let (status, body) = app
            .send(Method::GET, "/api/blog/not-a-uuid", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["kind"], "not_found");

        let missing = uuid::Uuid::new_v4();
        let (status, _) = app
            .send(Method::DELETE, &format!("/api/blog/{missing}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/api/blog/{missing}"),
                Some(&token),
                Some(json!({"content": "hello"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn content_is_sanitized_and_empty_content_rejected() {
        let app = TestApp::new();
        let token = app.user_token("alice01").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/blog",
                Some(&token),
                Some(json!({"title": "XSS", "body": "<p>safe</p><script>alert(1)</script>"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["blog"]["body"], "<p>safe</p>");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/blog",
                Some(&token),
                Some(json!({"title": "", "body": "<script>x</script>"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);

        let (_, list) = app.send(Method::GET, "/api/blog", None, None).await;
        assert_eq!(list["blogs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/health/live")
            .body(Body::empty())
            .unwrap();

        let response = router(app.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
