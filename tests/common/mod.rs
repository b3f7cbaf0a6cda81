//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config,
//! and full [`AppContext`]. The [`with_server`] constructor starts Axum on a
//! random port for HTTP-level testing.

use std::net::SocketAddr;

use tc_core::config::Config;
use tc_core::{ChannelId, ThumbnailSet, Video, VideoId};
use tc_db::pool::{init_memory_pool, DbPool};
use tc_server::context::AppContext;
use tc_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

#[allow(dead_code)]
impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, db.clone());
        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> tc_db::pool::PooledConnection {
        tc_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert an enabled subscription.
    pub fn seed_subscription(&self, channel_id: &str, title: &str) {
        let conn = self.conn();
        tc_db::queries::subscriptions::upsert_subscription(
            &conn,
            &ChannelId::new(channel_id),
            title,
            &ThumbnailSet::default(),
        )
        .expect("failed to seed subscription");
    }

    /// Insert a cached video for a (previously seeded) channel.
    pub fn seed_video(&self, id: &str, channel_id: &str, published_at: i64, duration_secs: i64) {
        let video = Video {
            id: VideoId::new(id),
            title: format!("video {id}"),
            description: None,
            channel_id: ChannelId::new(channel_id),
            channel_title: format!("channel {channel_id}"),
            published_at,
            duration_secs,
            thumbnails: ThumbnailSet::default(),
        };
        let conn = self.conn();
        tc_db::queries::videos::upsert_video(&conn, &video).expect("failed to seed video");
    }

    /// Store a credential set so authenticated workflows can run.
    pub fn seed_tokens(&self, access_token: &str, expiry: i64) {
        let conn = self.conn();
        tc_db::queries::profiles::upsert_tokens(
            &conn,
            access_token,
            Some("test-refresh"),
            Some(expiry),
            Some("Bearer"),
            None,
        )
        .expect("failed to seed tokens");
    }
}
