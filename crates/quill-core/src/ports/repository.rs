use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Group, NewComment, NewGroup, NewPost, Post, User};
use crate::error::RepoError;

/// Generic repository trait with the lookups every resource supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID, applying the store's referential actions.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Insert or update a user.
    async fn save(&self, user: User) -> Result<User, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i32> {
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    /// Insert a group. A duplicate slug is a [`RepoError::Constraint`].
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Post repository.
///
/// Deleting a post removes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// All posts in id order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Persist the client-mutable fields (`text`, `image`, `group`).
    async fn update(&self, post: Post) -> Result<Post, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Comments of one post in creation order.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Persist the comment's `text`.
    async fn update(&self, comment: Comment) -> Result<Comment, RepoError>;
}
