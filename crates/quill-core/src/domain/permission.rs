//! Ownership rule for authored resources.
//!
//! Authentication is a precondition enforced before any of this runs. The
//! rule itself only decides whether an authenticated requester may act on
//! an object that has already been located.

use uuid::Uuid;

use crate::error::DomainError;

/// What a request intends to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Retrieval or listing.
    Read,
    /// Update, partial update or delete.
    Write,
}

/// A resource with a single owning author.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

/// Reads are always allowed; writes only for the resource's author.
pub fn can_modify<R>(operation: Operation, resource: &R, requester: Uuid) -> bool
where
    R: Authored + ?Sized,
{
    match operation {
        Operation::Read => true,
        Operation::Write => resource.author_id() == requester,
    }
}

/// [`can_modify`] as a `Result`, failing with [`DomainError::PermissionDenied`].
pub fn authorize<R>(operation: Operation, resource: &R, requester: Uuid) -> Result<(), DomainError>
where
    R: Authored + ?Sized,
{
    if can_modify(operation, resource, requester) {
        Ok(())
    } else {
        tracing::debug!(
            author = %resource.author_id(),
            requester = %requester,
            "Write denied to non-author"
        );
        Err(DomainError::PermissionDenied)
    }
}
