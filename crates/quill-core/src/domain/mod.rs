//! Domain entities - the core business objects.

mod comment;
mod group;
mod permission;
mod post;
mod user;

pub use comment::{Comment, NewComment};
pub use group::{Group, NewGroup};
pub use permission::{Authored, Operation, authorize, can_modify};
pub use post::{NewPost, Post, PostChanges};
pub use user::{ADMIN_ROLE, Author, USER_ROLE, User};

use crate::error::DomainError;

/// Post and comment bodies must contain something other than whitespace.
fn require_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        Err(DomainError::validation("text", "This field may not be blank."))
    } else {
        Ok(())
    }
}

/// A `text` field as sent by the client: absent, explicitly `null`, or set.
fn check_text(text: &Option<Option<String>>, required: bool) -> Result<(), DomainError> {
    match text {
        Some(Some(text)) => require_text(text),
        Some(None) => Err(DomainError::validation("text", "This field may not be null.")),
        None if required => Err(DomainError::validation("text", "This field is required.")),
        None => Ok(()),
    }
}
