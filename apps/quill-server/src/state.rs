//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    AboutRepository, CommentRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use quill_core::services::{CommentService, PostService};
use quill_infra::{Argon2PasswordService, JwtTokenService, MemoryStore};

use crate::config::AppConfig;
use crate::views::Views;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub abouts: Arc<dyn AboutRepository>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub views: Arc<Views>,
    pub posts_per_page: u64,
    pub secure_cookies: bool,
    /// Backend name reported by the health check.
    pub storage: &'static str,
}

struct Repositories {
    backend: &'static str,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    abouts: Arc<dyn AboutRepository>,
}

impl Repositories {
    fn in_memory(store: &MemoryStore) -> Self {
        Self {
            backend: "memory",
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            abouts: Arc::new(store.abouts()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &quill_infra::DatabaseConfig) -> std::io::Result<Self> {
        use migration::{Migrator, MigratorTrait};
        use quill_infra::database::{
            PostgresAboutRepository, PostgresCommentRepository, PostgresPostRepository,
            PostgresUserRepository, connect,
        };

        let db = connect(config).await.map_err(std::io::Error::other)?;
        Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            backend: "postgres",
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            abouts: Arc::new(PostgresAboutRepository::new(db)),
        })
    }
}

impl AppState {
    /// Build the state from configuration: Postgres when `DATABASE_URL` is
    /// set, the in-memory store otherwise.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db) => Repositories::postgres(db).await?,
            None => {
                tracing::warn!("DATABASE_URL not set. Using the in-memory store.");
                Repositories::in_memory(&MemoryStore::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using the in-memory store");
            Repositories::in_memory(&MemoryStore::new())
        };

        Self::assemble(repos, config).map_err(std::io::Error::other)
    }

    /// State over an existing in-memory store, so callers can seed it.
    pub fn in_memory(store: &MemoryStore, config: &AppConfig) -> Result<Self, minijinja::Error> {
        Self::assemble(Repositories::in_memory(store), config)
    }

    fn assemble(repos: Repositories, config: &AppConfig) -> Result<Self, minijinja::Error> {
        let post_service = PostService::new(
            repos.posts.clone(),
            repos.comments.clone(),
            repos.users.clone(),
        );
        let comment_service = CommentService::new(repos.comments.clone());

        tracing::info!(storage = repos.backend, "Application state initialized");

        Ok(Self {
            users: repos.users,
            posts: repos.posts,
            comments: repos.comments,
            abouts: repos.abouts,
            post_service: Arc::new(post_service),
            comment_service: Arc::new(comment_service),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            views: Arc::new(Views::new()?),
            posts_per_page: config.posts_per_page,
            secure_cookies: config.session_cookie_secure,
            storage: repos.backend,
        })
    }
}
