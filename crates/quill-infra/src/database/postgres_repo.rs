//! SeaORM repository implementations.
//!
//! Referential actions are left to the schema: deleting a group sets
//! `posts.group_id` to NULL and deleting a post cascades to its comments.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};

use quill_core::domain::{Author, Comment, Group, NewComment, NewGroup, NewPost, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// User repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let exists = UserEntity::find_by_id(user.id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();

        let active_model: user::ActiveModel = user.into();
        let model = if exists {
            active_model.update(&self.db).await
        } else {
            active_model.insert(&self.db).await
        }
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel {
            id: NotSet,
            title: Set(group.title),
            slug: Set(group.slug),
            description: Set(group.description),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }
}

/// Rows loaded with their author; a missing author means the join is broken.
fn with_author<M, T>(
    row: (M, Option<user::Model>),
    attach: impl FnOnce(M, Author) -> T,
) -> Result<T, RepoError> {
    match row {
        (model, Some(author)) => Ok(attach(model, author.into())),
        (_, None) => Err(RepoError::Query("row references a missing author".to_string())),
    }
}

/// Post repository. Posts are always loaded together with their author.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for PostgresPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(|row| with_author(row, post::Model::into_post))
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|row| with_author(row, post::Model::into_post))
            .collect()
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            text: Set(post.text),
            pub_date: Set(post.pub_date.into()),
            author_id: Set(post.author.id),
            image: Set(post.image),
            group_id: Set(post.group),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into_post(post.author))
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Unchanged(post.id),
            text: Set(post.text),
            image: Set(post.image),
            group_id: Set(post.group),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into_post(post.author))
    }
}

/// Comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for PostgresCommentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        CommentEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(|row| with_author(row, comment::Model::into_comment))
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|row| with_author(row, comment::Model::into_comment))
            .collect()
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            text: Set(comment.text),
            created: Set(comment.created.into()),
            author_id: Set(comment.author.id),
            post_id: Set(comment.post),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into_comment(comment.author))
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: Unchanged(comment.id),
            text: Set(comment.text),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into_comment(comment.author))
    }
}
