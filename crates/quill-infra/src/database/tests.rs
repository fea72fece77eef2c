#[cfg(test)]
mod mock_tests {
    use crate::database::entity::group;
    use crate::database::postgres_repo::PostgresGroupRepository;
    use quill_core::domain::Group;
    use quill_core::ports::{BaseRepository, GroupRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn cats() -> group::Model {
        group::Model {
            id: 1,
            title: "Cats".to_owned(),
            slug: "cats".to_owned(),
            description: "All about cats".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_find_group_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![cats()]])
            .into_connection();

        let repo = PostgresGroupRepository::new(db);

        let result: Option<Group> = repo.find_by_id(1).await.unwrap();

        let group = result.expect("group is returned");
        assert_eq!(group.slug, "cats");
        assert_eq!(group.description, "All about cats");
    }

    #[tokio::test]
    async fn test_list_groups_maps_every_row() {
        let mut dogs = cats();
        dogs.id = 2;
        dogs.slug = "dogs".to_owned();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![cats(), dogs]])
            .into_connection();

        let groups = PostgresGroupRepository::new(db).list().await.unwrap();

        let slugs: Vec<_> = groups.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(slugs, vec!["cats", "dogs"]);
    }
}

/// Repositories against a migrated in-memory SQLite database, so the
/// schema's referential actions are exercised for real.
#[cfg(test)]
mod sqlite_tests {
    use migration::{Migrator, MigratorTrait};
    use quill_core::domain::{Comment, Group, NewComment, NewGroup, NewPost, Post, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{
        BaseRepository, CommentRepository, GroupRepository, PostRepository, UserRepository,
    };
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn};

    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresGroupRepository, PostgresPostRepository,
        PostgresUserRepository,
    };

    struct Repos {
        users: PostgresUserRepository,
        groups: PostgresGroupRepository,
        posts: PostgresPostRepository,
        comments: PostgresCommentRepository,
    }

    async fn setup_test_db() -> DbConn {
        // One connection: every pooled connection would get its own memory database.
        let opts = ConnectOptions::new("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .to_owned();
        let db = Database::connect(opts)
            .await
            .expect("Failed to create in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .expect("Failed to enable foreign keys");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    async fn setup() -> Repos {
        let db = setup_test_db().await;
        Repos {
            users: PostgresUserRepository::new(db.clone()),
            groups: PostgresGroupRepository::new(db.clone()),
            posts: PostgresPostRepository::new(db.clone()),
            comments: PostgresCommentRepository::new(db),
        }
    }

    async fn seed_user(repos: &Repos, username: &str) -> User {
        repos
            .users
            .save(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    async fn seed_group(repos: &Repos, slug: &str) -> Group {
        repos
            .groups
            .create(NewGroup {
                title: slug.to_uppercase(),
                slug: slug.to_string(),
                description: format!("{slug} description"),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_save_inserts_then_updates() {
        let repos = setup().await;
        let user = seed_user(&repos, "alice").await;

        let promoted = repos.users.save(user.clone().into_staff()).await.unwrap();
        assert!(promoted.is_staff);

        let found = repos.users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(found.is_staff);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_constraint_violation() {
        let repos = setup().await;
        seed_group(&repos, "cats").await;

        let result = repos
            .groups
            .create(NewGroup {
                title: "More cats".into(),
                slug: "cats".into(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_is_loaded_with_author() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;
        let group = seed_group(&repos, "cats").await;

        let created = repos
            .posts
            .create(NewPost::new(
                alice.as_author(),
                "hello".into(),
                Some("posts/cat.png".into()),
                Some(group.id),
            ))
            .await
            .unwrap();

        let found: Post = repos.posts.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.author.username, "alice");
        assert_eq!(found.author.id, alice.id);
        assert_eq!(found.group, Some(group.id));
        assert_eq!(found.image.as_deref(), Some("posts/cat.png"));
    }

    #[tokio::test]
    async fn test_post_update_keeps_author_and_pub_date() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;
        let created = repos
            .posts
            .create(NewPost::new(alice.as_author(), "hello".into(), None, None))
            .await
            .unwrap();
        let stored: Post = repos.posts.find_by_id(created.id).await.unwrap().unwrap();

        let mut edited = stored.clone();
        edited.text = "edited".into();
        repos.posts.update(edited).await.unwrap();

        let reloaded: Post = repos.posts.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.text, "edited");
        assert_eq!(reloaded.pub_date, stored.pub_date);
        assert_eq!(reloaded.author, stored.author);
    }

    #[tokio::test]
    async fn test_group_delete_nullifies_post_group() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;
        let group = seed_group(&repos, "cats").await;
        let post = repos
            .posts
            .create(NewPost::new(
                alice.as_author(),
                "hello".into(),
                None,
                Some(group.id),
            ))
            .await
            .unwrap();

        BaseRepository::<Group, i32>::delete(&repos.groups, group.id)
            .await
            .unwrap();

        let post: Post = repos
            .posts
            .find_by_id(post.id)
            .await
            .unwrap()
            .expect("post survives group deletion");
        assert_eq!(post.group, None);
    }

    #[tokio::test]
    async fn test_post_delete_cascades_to_comments() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;
        let bob = seed_user(&repos, "bob").await;
        let post = repos
            .posts
            .create(NewPost::new(alice.as_author(), "hello".into(), None, None))
            .await
            .unwrap();
        let first = repos
            .comments
            .create(NewComment::new(bob.as_author(), post.id, "first".into()))
            .await
            .unwrap();
        repos
            .comments
            .create(NewComment::new(alice.as_author(), post.id, "second".into()))
            .await
            .unwrap();

        repos.posts.delete(post.id).await.unwrap();

        let orphan: Option<Comment> = repos.comments.find_by_id(first.id).await.unwrap();
        assert!(orphan.is_none());
        assert!(repos.comments.list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comments_listed_per_post_in_creation_order() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;
        let one = repos
            .posts
            .create(NewPost::new(alice.as_author(), "one".into(), None, None))
            .await
            .unwrap();
        let two = repos
            .posts
            .create(NewPost::new(alice.as_author(), "two".into(), None, None))
            .await
            .unwrap();

        for text in ["a", "b", "c"] {
            repos
                .comments
                .create(NewComment::new(alice.as_author(), one.id, text.into()))
                .await
                .unwrap();
        }
        repos
            .comments
            .create(NewComment::new(alice.as_author(), two.id, "elsewhere".into()))
            .await
            .unwrap();

        let texts: Vec<String> = repos
            .comments
            .list_for_post(one.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_violates_foreign_key() {
        let repos = setup().await;
        let alice = seed_user(&repos, "alice").await;

        let result = repos
            .comments
            .create(NewComment::new(alice.as_author(), 999, "orphan".into()))
            .await;

        assert!(matches!(result, Err(RepoError::Reference(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let repos = setup().await;

        let result = repos.posts.delete(42).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
