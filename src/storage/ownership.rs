// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutating operations.
//!
//! Every update or delete of a blog or comment passes through these checks
//! after the resource has been loaded and before anything is written.

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult, StoredBlog, StoredComment};

/// Compare a resource's recorded author with the acting identity.
pub fn check_owner(resource_author_id: &str, requester_id: &str) -> bool {
    resource_author_id == requester_id
}

/// Trait for resources that record their author.
pub trait OwnedResource {
    /// The author's user ID, fixed at creation.
    fn author_id(&self) -> &str;

    /// Resource kind used in error messages ("blog", "comment").
    fn resource_type(&self) -> &'static str;

    fn resource_id(&self) -> &str;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user authored this resource.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if the user is not the author.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if check_owner(self.author_id(), &user.user_id) {
            Ok(())
        } else {
            Err(denied(user, self))
        }
    }
}

/// Verify that the user may delete a comment.
///
/// Deletion is allowed for the comment's author and, as moderation, for the
/// author of the blog it is attached to. Editing stays author-only and uses
/// [`OwnershipEnforcer::verify_ownership`].
pub fn verify_comment_removal(
    comment: &StoredComment,
    parent: &StoredBlog,
    user: &AuthenticatedUser,
) -> StorageResult<()> {
    if check_owner(&comment.author_id, &user.user_id)
        || check_owner(&parent.author_id, &user.user_id)
    {
        Ok(())
    } else {
        Err(denied(user, comment))
    }
}

fn denied(user: &AuthenticatedUser, resource: &impl OwnedResource) -> StorageError {
    StorageError::PermissionDenied {
        user_id: user.user_id.clone(),
        resource: resource.resource_type(),
        resource_id: resource.resource_id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(user_id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user_id.to_string(),
            username: format!("name-{user_id}"),
            issued_at: 0,
            expires_at: 0,
        }
    }

    #[test]
    fn check_owner_is_exact_match() {
        assert!(check_owner("user_123", "user_123"));
        assert!(!check_owner("user_123", "user_1234"));
        assert!(!check_owner("user_123", "USER_123"));
        assert!(!check_owner("user_123", ""));
    }

    #[test]
    fn ownership_verification_passes_for_author() {
        let blog = StoredBlog::new("user_123", "t", "b");
        assert!(blog.verify_ownership(&make_user("user_123")).is_ok());
    }

    #[test]
    fn ownership_verification_fails_for_other_user() {
        let blog = StoredBlog::new("user_123", "t", "b");
        let result = blog.verify_ownership(&make_user("user_456"));

        match result {
            Err(StorageError::PermissionDenied {
                user_id,
                resource,
                resource_id,
            }) => {
                assert_eq!(user_id, "user_456");
                assert_eq!(resource, "blog");
                assert_eq!(resource_id, blog.id);
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn comment_edit_is_author_only() {
        let blog = StoredBlog::new("blog_author", "t", "b");
        let comment = StoredComment::new(&blog.id, "comment_author", "c");

        assert!(comment.verify_ownership(&make_user("comment_author")).is_ok());
        assert!(comment.verify_ownership(&make_user("blog_author")).is_err());
    }

    #[test]
    fn comment_removal_allows_comment_or_blog_author() {
        let blog = StoredBlog::new("blog_author", "t", "b");
        let comment = StoredComment::new(&blog.id, "comment_author", "c");

        assert!(verify_comment_removal(&comment, &blog, &make_user("comment_author")).is_ok());
        assert!(verify_comment_removal(&comment, &blog, &make_user("blog_author")).is_ok());

        let result = verify_comment_removal(&comment, &blog, &make_user("bystander"));
        assert!(matches!(
            result,
            Err(StorageError::PermissionDenied { resource: "comment", .. })
        ));
    }
}
