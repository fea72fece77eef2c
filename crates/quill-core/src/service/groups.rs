use std::sync::Arc;

use crate::domain::{Group, NewGroup};
use crate::error::{DomainError, RepoError};
use crate::ports::GroupRepository;

use super::missing_as_not_found;

/// Read access to groups, plus the administrative create/delete.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    pub async fn retrieve(&self, id: i32) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("group", id))
    }

    /// Administrators only; callers check the role.
    pub async fn create(&self, group: NewGroup) -> Result<Group, DomainError> {
        group.validate()?;
        let slug = group.slug.clone();
        let created = self.groups.create(group).await.map_err(|err| match err {
            RepoError::Constraint(_) => {
                DomainError::Duplicate(format!("group with slug '{slug}' already exists"))
            }
            other => other.into(),
        })?;
        tracing::info!(group_id = created.id, slug = %created.slug, "Group created");
        Ok(created)
    }

    /// Administrators only. Posts in the group survive with no group.
    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.groups
            .delete(id)
            .await
            .map_err(missing_as_not_found("group", id))?;
        tracing::info!(group_id = id, "Group deleted");
        Ok(())
    }
}
