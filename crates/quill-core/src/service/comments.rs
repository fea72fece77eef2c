use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, Comment, NewComment, Operation, authorize};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

use super::missing_as_not_found;

/// Comment access contracts, always scoped to the post in the request path.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    pub async fn list(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        self.ensure_post_exists(post_id).await?;
        Ok(self.comments.list_for_post(post_id).await?)
    }

    pub async fn retrieve(
        &self,
        requester: Uuid,
        post_id: i32,
        id: i32,
    ) -> Result<Comment, DomainError> {
        let comment = self.find(post_id, id).await?;
        authorize(Operation::Read, &comment, requester)?;
        Ok(comment)
    }

    /// Author and post come from the session and the path, never the body.
    pub async fn create(
        &self,
        author: Author,
        post_id: i32,
        text: String,
    ) -> Result<Comment, DomainError> {
        self.ensure_post_exists(post_id).await?;

        let new_comment = NewComment::new(author, post_id, text);
        new_comment.validate()?;

        let comment = match self.comments.create(new_comment).await {
            Ok(comment) => comment,
            Err(RepoError::Reference(_)) => return Err(self.missing_reference(post_id).await),
            Err(other) => return Err(other.into()),
        };
        tracing::info!(comment_id = comment.id, post_id, "Comment created");
        Ok(comment)
    }

    /// Partial update: an absent `text` leaves the comment as it is.
    pub async fn update(
        &self,
        requester: Uuid,
        post_id: i32,
        id: i32,
        text: Option<Option<String>>,
    ) -> Result<Comment, DomainError> {
        self.edit(requester, post_id, id, text, false).await
    }

    /// Full update: `text` must be present.
    pub async fn replace(
        &self,
        requester: Uuid,
        post_id: i32,
        id: i32,
        text: Option<Option<String>>,
    ) -> Result<Comment, DomainError> {
        self.edit(requester, post_id, id, text, true).await
    }

    async fn edit(
        &self,
        requester: Uuid,
        post_id: i32,
        id: i32,
        text: Option<Option<String>>,
        required: bool,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.find(post_id, id).await?;
        authorize(Operation::Write, &comment, requester)?;

        comment.edit_text(text, required)?;

        let comment = self
            .comments
            .update(comment)
            .await
            .map_err(missing_as_not_found("comment", id))?;
        tracing::info!(comment_id = comment.id, post_id, "Comment updated");
        Ok(comment)
    }

    pub async fn delete(&self, requester: Uuid, post_id: i32, id: i32) -> Result<(), DomainError> {
        let comment = self.find(post_id, id).await?;
        authorize(Operation::Write, &comment, requester)?;

        self.comments
            .delete(id)
            .await
            .map_err(missing_as_not_found("comment", id))?;
        tracing::info!(comment_id = id, post_id, "Comment deleted");
        Ok(())
    }

    /// A comment under a different post is reported as missing.
    async fn find(&self, post_id: i32, id: i32) -> Result<Comment, DomainError> {
        self.ensure_post_exists(post_id).await?;
        self.comments
            .find_by_id(id)
            .await?
            .filter(|comment| comment.post == post_id)
            .ok_or(DomainError::not_found("comment", id))
    }

    /// A rejected reference means the post vanished after the check, or the
    /// author no longer exists.
    async fn missing_reference(&self, post_id: i32) -> DomainError {
        match self.posts.find_by_id(post_id).await {
            Ok(None) => DomainError::not_found("post", post_id),
            Ok(Some(_)) => DomainError::Unauthenticated,
            Err(err) => err.into(),
        }
    }

    async fn ensure_post_exists(&self, post_id: i32) -> Result<(), DomainError> {
        match self.posts.find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("post", post_id)),
        }
    }
}
