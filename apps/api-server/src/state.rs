//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PostRepository, TextGenerator, UserRepository};
use scribe_core::services::{AiService, AuthService, PostService};
use scribe_infra::{
    Argon2PasswordService, GeminiClient, InMemoryPostRepository, InMemoryUserRepository,
    JwtTokenService,
};

use crate::config::AppConfig;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub ai: Arc<AiService>,
}

impl AppState {
    /// Wire services over the given repositories and optional model client.
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        generator: Option<Arc<dyn TextGenerator>>,
        config: &AppConfig,
    ) -> Self {
        let auth = AuthService::new(
            users,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
        )
        .with_legacy_rehash(config.rehash_legacy_on_login);

        Self {
            auth: Arc::new(auth),
            posts: Arc::new(PostService::new(posts)),
            ai: Arc::new(AiService::new(generator)),
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn from_config(config: &AppConfig) -> Self {
        let (users, posts) = repositories(config).await;

        let generator: Option<Arc<dyn TextGenerator>> =
            match GeminiClient::from_config(config.gemini.clone()) {
                Ok(Some(client)) => Some(Arc::new(client)),
                Ok(None) => {
                    tracing::warn!("GEMINI_API_KEY not set. AI endpoints return placeholders.");
                    None
                }
                Err(e) => {
                    tracing::error!("Failed to build Gemini client: {}. AI endpoints return placeholders.", e);
                    None
                }
            };

        tracing::info!("Application state initialized");

        Self::new(users, posts, generator, config)
    }
}

fn in_memory() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> Repositories {
    use migration::{Migrator, MigratorTrait};
    use scribe_infra::database::connect;
    use scribe_infra::{PostgresPostRepository, PostgresUserRepository};

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    let conn = match connect(db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return in_memory();
        }
    };

    if config.run_migrations {
        if let Err(e) = Migrator::up(&conn, None).await {
            tracing::error!("Database migration failed: {}. Using in-memory fallback.", e);
            return in_memory();
        }
        tracing::info!("Database schema up to date");
    }

    (
        Arc::new(PostgresUserRepository::new(conn.clone())),
        Arc::new(PostgresPostRepository::new(conn)),
    )
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_config: &AppConfig) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory()
}
