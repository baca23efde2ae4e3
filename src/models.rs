// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` or `Deserialize` plus
//! `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! ## Validation
//!
//! Request fields default to empty so that a missing field is reported by
//! `validate()` alongside the other broken rules instead of as a JSON
//! rejection. Each `validate()` returns either the cleaned values or every
//! failure message; handlers return before touching storage on failure.
//!
//! ## Model Categories
//!
//! - **Accounts**: signup, login, session tokens
//! - **Blogs**: posts with their author populated
//! - **Comments**: comments attached to a blog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sanitize::Sanitizer;
use crate::storage::{StoredBlog, StoredComment, StoredUser};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;

// =============================================================================
// Account Models
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    /// Login name, 3 to 30 characters after trimming.
    pub username: String,
    /// Password, 8 to 128 characters.
    pub password: String,
    /// Must repeat `password` exactly.
    pub repassword: String,
}

/// Signup input that passed validation.
#[derive(Debug)]
pub struct ValidSignup {
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<ValidSignup, Vec<String>> {
        let mut errors = Vec::new();

        let username = self.username.trim().to_string();
        let username_len = username.chars().count();
        if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_len) {
            errors.push(format!(
                "Username should be within {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
            ));
        }

        let password_len = self.password.chars().count();
        if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&password_len) {
            errors.push(format!(
                "Password should be within {PASSWORD_MIN_CHARS} and {PASSWORD_MAX_CHARS} characters"
            ));
        }

        if self.repassword.is_empty() {
            errors.push("Re-password is required".to_string());
        } else if self.repassword != self.password {
            errors.push("Passwords do not match".to_string());
        }

        if errors.is_empty() {
            Ok(ValidSignup {
                username,
                password: self.password,
            })
        } else {
            Err(errors)
        }
    }
}

/// Public view of a user. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<&StoredUser> for UserSummary {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

/// Response for a successful signup.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub msg: String,
    pub user: UserSummary,
}

/// Request to log in.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A signed session token and the identity it carries.
///
/// Returned by login and by token refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Expiration as Unix seconds.
    pub expires_at: i64,
    pub user: UserSummary,
}

impl LoginResponse {
    pub fn bearer(access_token: String, expires_at: i64, user: UserSummary) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_at,
            user,
        }
    }
}

// =============================================================================
// Blog Models
// =============================================================================

/// Request to create or update a blog.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BlogRequest {
    /// At least one non-blank character.
    pub title: String,
    /// HTML body; sanitized before storage.
    pub body: String,
}

/// Blog input that passed validation, body already sanitized.
#[derive(Debug)]
pub struct ValidBlog {
    pub title: String,
    pub body: String,
}

impl BlogRequest {
    pub fn validate(self, sanitizer: &dyn Sanitizer) -> Result<ValidBlog, Vec<String>> {
        let mut errors = Vec::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.push("Title should have at least 1 character".to_string());
        }

        let body = sanitizer.sanitize_html(&self.body);
        if body.trim().is_empty() {
            errors.push("Body should not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(ValidBlog { title, body })
        } else {
            Err(errors)
        }
    }
}

/// Blog as listed by `GET /api/blog`: no comments or dates.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlogSummary {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: UserSummary,
}

/// Blog with its author and comments populated.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlogView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub comments: Vec<CommentView>,
}

impl BlogView {
    pub fn new(blog: StoredBlog, author: UserSummary, comments: Vec<CommentView>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            body: blog.body,
            author,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            comments,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogListResponse {
    pub blogs: Vec<BlogSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogResponse {
    pub blog: BlogView,
}

/// Response for blog create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlogMutationResponse {
    pub msg: String,
    pub blog: BlogView,
}

// =============================================================================
// Comment Models
// =============================================================================

/// Request to add or edit a comment.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    /// HTML content; sanitized before storage.
    pub content: String,
}

impl CommentRequest {
    /// Returns the sanitized content.
    pub fn validate(self, sanitizer: &dyn Sanitizer) -> Result<String, Vec<String>> {
        let content = sanitizer.sanitize_html(&self.content);
        if content.trim().is_empty() {
            Err(vec!["Comment should not be empty".to_string()])
        } else {
            Ok(content)
        }
    }
}

/// Comment with its author populated.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentView {
    pub id: String,
    pub blog_id: String,
    pub content: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentView {
    pub fn new(comment: StoredComment, author: UserSummary) -> Self {
        Self {
            id: comment.id,
            blog_id: comment.blog_id,
            content: comment.content,
            author,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Response for comment create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentMutationResponse {
    pub msg: String,
    pub comment: CommentView,
}

/// Plain acknowledgement, used by deletes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::AmmoniaSanitizer;

    fn signup(username: &str, password: &str, repassword: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            repassword: repassword.to_string(),
        }
    }

    #[test]
    fn valid_signup_trims_username() {
        let valid = signup("  alice01  ", "longpassword1", "longpassword1")
            .validate()
            .unwrap();
        assert_eq!(valid.username, "alice01");
        assert_eq!(valid.password, "longpassword1");
    }

    #[test]
    fn signup_length_bounds() {
        assert!(signup("abc", "12345678", "12345678").validate().is_ok());
        assert!(signup(&"a".repeat(30), &"p".repeat(128), &"p".repeat(128))
            .validate()
            .is_ok());

        assert!(signup("ab", "12345678", "12345678").validate().is_err());
        assert!(signup(&"a".repeat(31), "12345678", "12345678").validate().is_err());
        assert!(signup("   ab   ", "12345678", "12345678").validate().is_err());
        assert!(signup("abc", "1234567", "1234567").validate().is_err());
        assert!(signup("abc", &"p".repeat(129), &"p".repeat(129))
            .validate()
            .is_err());
    }

    #[test]
    fn signup_reports_every_failure() {
        let errors = signup("a", "short", "").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&"Re-password is required".to_string()));
    }

    #[test]
    fn mismatched_repassword_fails() {
        let errors = signup("alice01", "longpassword1", "longpassword2")
            .validate()
            .unwrap_err();
        assert_eq!(errors, vec!["Passwords do not match".to_string()]);
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let request: SignupRequest = serde_json::from_str(r#"{"username":"alice01"}"#).unwrap();
        assert!(request.password.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn blog_validation_sanitizes_body() {
        let valid = BlogRequest {
            title: " Hello ".to_string(),
            body: "<p>ok</p><script>bad()</script>".to_string(),
        }
        .validate(&AmmoniaSanitizer)
        .unwrap();

        assert_eq!(valid.title, "Hello");
        assert_eq!(valid.body, "<p>ok</p>");
    }

    #[test]
    fn blog_requires_title_and_non_empty_body() {
        let errors = BlogRequest {
            title: "   ".to_string(),
            body: "<script>only()</script>".to_string(),
        }
        .validate(&AmmoniaSanitizer)
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn comment_validation() {
        let clean = CommentRequest {
            content: "<i>nice</i>".to_string(),
        }
        .validate(&AmmoniaSanitizer)
        .unwrap();
        assert_eq!(clean, "<i>nice</i>");

        assert!(CommentRequest::default().validate(&AmmoniaSanitizer).is_err());
    }

    #[test]
    fn login_response_uses_camel_case() {
        let response = LoginResponse::bearer(
            "tok".to_string(),
            42,
            UserSummary {
                id: "u1".to_string(),
                username: "alice01".to_string(),
            },
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "tok");
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["expiresAt"], 42);
        assert_eq!(json["user"]["username"], "alice01");
        assert!(json["user"].get("password_hash").is_none());
    }
}
