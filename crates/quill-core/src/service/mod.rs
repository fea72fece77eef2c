//! Services - the resource access contracts.
//!
//! Every method here assumes the caller is already authenticated. Object
//! level checks run after the object is located, so a non-author sees
//! `PermissionDenied` rather than `NotFound`.

mod comments;
mod groups;
mod posts;

pub use comments::CommentService;
pub use groups::GroupService;
pub use posts::PostService;

use crate::error::{DomainError, RepoError};

/// Turn a vanished row into `NotFound` for the entity being acted on.
fn missing_as_not_found(
    entity_type: &'static str,
    id: i32,
) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
