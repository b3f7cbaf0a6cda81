//! tc-server: HTTP API server for the broadcast timeline.
//!
//! This crate ties the core timeline engine and the database layer into a
//! running server application. It provides:
//!
//! - Axum-based HTTP API with CORS, request tracing, and OpenAPI docs
//! - YouTube Data API and OAuth clients for catalog ingestion
//! - Graceful shutdown via signal handling

pub mod catalog;
pub mod context;
pub mod error;
pub mod oauth;
pub mod router;
pub mod routes;
pub mod youtube;

use std::net::SocketAddr;

use tc_core::config::Config;

use crate::context::AppContext;

/// Start the tubecast server.
///
/// This is the main entry point. It initializes the database, constructs the
/// [`AppContext`], and runs the HTTP server until a shutdown signal arrives.
pub async fn start(config: Config) -> tc_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    // Initialize database.
    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| tc_core::Error::Io { source: e })?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let db = tc_db::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| tc_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, db);
    let app = router::build_router(ctx, static_dir);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| tc_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| tc_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
