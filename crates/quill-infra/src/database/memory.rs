//! In-memory store - used as fallback when no database is configured.
//!
//! Mirrors the schema's referential actions: deleting a group clears
//! `Post::group`, deleting a post removes its comments, and deleting a user
//! removes everything they authored. Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Group, NewComment, NewGroup, NewPost, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, GroupRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: BTreeMap<i32, Group>,
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
    last_group_id: i32,
    last_post_id: i32,
    last_comment_id: i32,
}

impl Tables {
    fn require_user(&self, id: Uuid) -> Result<(), RepoError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::Reference(format!("user {id} does not exist")))
        }
    }

    fn require_group(&self, id: Option<i32>) -> Result<(), RepoError> {
        match id {
            Some(id) if !self.groups.contains_key(&id) => {
                Err(RepoError::Reference(format!("group {id} does not exist")))
            }
            _ => Ok(()),
        }
    }

    fn remove_post(&mut self, id: i32) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.comments.retain(|_, comment| comment.post != id);
        Some(post)
    }
}

/// Every repository port over one set of tables behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let authored: Vec<i32> = tables
            .posts
            .values()
            .filter(|post| post.author.id == id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, comment| comment.author.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|other| other.username == user.username && other.id != user.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Group, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.groups.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.group == Some(id) {
                post.group = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        Ok(self.tables.read().await.groups.values().cloned().collect())
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|other| other.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                group.slug
            )));
        }

        tables.last_group_id += 1;
        let group = Group {
            id: tables.last_group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.remove_post(id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(post.author.id)?;
        tables.require_group(post.group)?;

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            text: post.text,
            pub_date: post.pub_date,
            author: post.author,
            image: post.image,
            group: post.group,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_group(post.group)?;

        let stored = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        stored.text = post.text;
        stored.image = post.image;
        stored.group = post.group;
        Ok(stored.clone())
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.post == post_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_user(comment.author.id)?;
        if !tables.posts.contains_key(&comment.post) {
            return Err(RepoError::Reference(format!(
                "post {} does not exist",
                comment.post
            )));
        }

        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            text: comment.text,
            created: comment.created,
            author: comment.author,
            post: comment.post,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .comments
            .get_mut(&comment.id)
            .ok_or(RepoError::NotFound)?;
        stored.text = comment.text;
        Ok(stored.clone())
    }
}
