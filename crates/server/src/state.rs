//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::services::auth::{AuthService, TokenKeys};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    token_keys: TokenKeys,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Derives the token signing/verification keys from the configured
    /// secret once, up front.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        let token_keys = TokenKeys::from_secret(config.jwt_secret.expose_secret().as_bytes());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                token_keys,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token keys.
    #[must_use]
    pub fn token_keys(&self) -> &TokenKeys {
        &self.inner.token_keys
    }

    /// Build an auth service borrowing this state's pool and keys.
    #[must_use]
    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(
            self.pool(),
            self.token_keys(),
            self.inner.config.token_ttl_days,
        )
    }
}
