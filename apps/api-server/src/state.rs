//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{
    CommentRepository, GroupRepository, PasswordService, PostRepository, RateLimiter,
    TokenService, UserRepository,
};
use quill_core::service::{CommentService, GroupService, PostService};
use quill_infra::{Argon2PasswordService, InMemoryRateLimiter, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use quill_infra::database::{
    PostgresCommentRepository, PostgresGroupRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::{AdminAccount, AppConfig};
use crate::middleware::error::{AppError, AppResult};

/// Repository ports backing the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn database(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
        }
    }
}

/// Where the data lives, reported by the health check.
#[derive(Clone)]
pub enum Storage {
    Memory,
    #[cfg(feature = "postgres")]
    Database(Arc<DatabaseConnections>),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Memory => "memory",
            #[cfg(feature = "postgres")]
            Storage::Database(_) => "postgres",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: GroupService,
    pub posts: PostService,
    pub comments: CommentService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// the database is not configured or unreachable.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = Self::connect(config).await;

        let state = Self::from_parts(
            repos,
            storage,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        );

        tracing::info!(storage = state.storage.name(), "Application state initialized");
        state
    }

    pub fn from_parts(
        repos: Repositories,
        storage: Storage,
        tokens: Arc<dyn TokenService>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            users: repos.users,
            groups: GroupService::new(repos.groups.clone()),
            posts: PostService::new(repos.posts.clone(), repos.groups),
            comments: CommentService::new(repos.comments, repos.posts),
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter,
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> (Repositories, Storage) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Repositories::in_memory(), Storage::Memory);
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let repos = Repositories::database(&connections);
                (repos, Storage::Database(Arc::new(connections)))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (Repositories::in_memory(), Storage::Memory)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(config: &AppConfig) -> (Repositories, Storage) {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        (Repositories::in_memory(), Storage::Memory)
    }

    /// Create the configured staff account, or promote it if it already exists.
    pub async fn ensure_admin(&self, account: &AdminAccount) -> AppResult<User> {
        if let Some(existing) = self.users.find_by_username(&account.username).await? {
            if existing.is_staff {
                return Ok(existing);
            }
            let promoted = self.users.save(existing.into_staff()).await?;
            tracing::info!(username = %promoted.username, "Promoted user to staff");
            return Ok(promoted);
        }

        User::validate_username(&account.username)?;
        let password_hash = self
            .passwords
            .hash(&account.password)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let admin = self
            .users
            .save(User::new(account.username.clone(), password_hash).into_staff())
            .await?;
        tracing::info!(username = %admin.username, "Created staff account");
        Ok(admin)
    }
}
