use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, NewPost, Operation, Post, PostChanges, authorize};
use crate::error::{DomainError, RepoError};
use crate::ports::{GroupRepository, PostRepository};

use super::missing_as_not_found;

/// Post access contracts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { posts, groups }
    }

    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list().await?)
    }

    pub async fn retrieve(&self, requester: Uuid, id: i32) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        authorize(Operation::Read, &post, requester)?;
        Ok(post)
    }

    /// The requester becomes the author; `pub_date` is stamped now.
    pub async fn create(
        &self,
        author: Author,
        text: String,
        image: Option<String>,
        group: Option<i32>,
    ) -> Result<Post, DomainError> {
        let new_post = NewPost::new(author, text, image, group);
        new_post.validate()?;
        self.ensure_group_exists(new_post.group).await?;

        let group = new_post.group;
        let post = match self.posts.create(new_post).await {
            Ok(post) => post,
            Err(RepoError::Reference(_)) => return Err(self.missing_reference(group).await),
            Err(other) => return Err(other.into()),
        };
        tracing::info!(post_id = post.id, author = %post.author.username, "Post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        requester: Uuid,
        id: i32,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let mut post = self.find(id).await?;
        authorize(Operation::Write, &post, requester)?;

        changes.validate()?;
        self.ensure_group_exists(changes.new_group()).await?;
        changes.apply(&mut post);

        let group = post.group;
        let post = match self.posts.update(post).await {
            Ok(post) => post,
            Err(RepoError::Reference(_)) => return Err(self.missing_reference(group).await),
            Err(other) => return Err(missing_as_not_found("post", id)(other)),
        };
        tracing::info!(post_id = post.id, "Post updated");
        Ok(post)
    }

    /// Deletes the post and, with it, all of its comments.
    pub async fn delete(&self, requester: Uuid, id: i32) -> Result<(), DomainError> {
        let post = self.find(id).await?;
        authorize(Operation::Write, &post, requester)?;
        self.remove(id).await
    }

    /// Administrative delete that skips the ownership rule.
    pub async fn delete_as_admin(&self, id: i32) -> Result<(), DomainError> {
        self.find(id).await?;
        self.remove(id).await
    }

    async fn remove(&self, id: i32) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(missing_as_not_found("post", id))?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn find(&self, id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("post", id))
    }

    async fn ensure_group_exists(&self, group: Option<i32>) -> Result<(), DomainError> {
        let Some(group_id) = group else {
            return Ok(());
        };
        match self.groups.find_by_id(group_id).await? {
            Some(_) => Ok(()),
            None => Err(unknown_group(group_id)),
        }
    }

    /// A rejected reference means the group was deleted after the check, or
    /// the author no longer exists.
    async fn missing_reference(&self, group: Option<i32>) -> DomainError {
        if let Some(group_id) = group {
            match self.groups.find_by_id(group_id).await {
                Ok(None) => return unknown_group(group_id),
                Err(err) => return err.into(),
                Ok(Some(_)) => {}
            }
        }
        DomainError::Unauthenticated
    }
}

fn unknown_group(group_id: i32) -> DomainError {
    DomainError::validation(
        "group",
        format!("Invalid pk \"{group_id}\" - object does not exist."),
    )
}
