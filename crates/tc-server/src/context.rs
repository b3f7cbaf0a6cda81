//! Shared application context.
//!
//! [`AppContext`] is the central struct shared across all route handlers via
//! Axum state. It is cheaply cloneable because it only holds `Arc`s and the
//! (internally Arc-backed) connection pool.

use std::sync::Arc;

use tc_core::config::Config;
use tc_db::pool::DbPool;

use crate::oauth::OAuthClient;
use crate::youtube::YouTubeClient;

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration, passed by construction.
    pub config: Arc<Config>,
    /// YouTube Data API client.
    pub youtube: Arc<YouTubeClient>,
    /// OAuth token exchange/refresh client.
    pub oauth: Arc<OAuthClient>,
}

impl AppContext {
    /// Build a context from a configuration and an initialized pool.
    pub fn new(config: Config, db: DbPool) -> Self {
        let youtube = Arc::new(YouTubeClient::new(&config.youtube));
        let oauth = Arc::new(OAuthClient::new(&config.youtube));
        Self {
            db,
            config: Arc::new(config),
            youtube,
            oauth,
        }
    }
}
