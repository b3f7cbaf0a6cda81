//! Axum router construction.
//!
//! Builds the full application router with all route groups, middleware
//! layers, and static file serving.

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::context::AppContext;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::timeline::get_timeline,
        routes::feed::get_feed,
        routes::feed::refresh_feed,
        routes::subscriptions::list_subscriptions,
        routes::subscriptions::sync_subscriptions,
        routes::subscriptions::toggle_subscription,
        routes::profile::get_profile,
        routes::oauth::oauth_callback,
    ),
    components(schemas(
        routes::health::HealthResponse,
        routes::timeline::TimelineResponse,
        routes::feed::FeedResponse,
        routes::feed::RefreshResponse,
        routes::subscriptions::SubscriptionResponse,
        routes::subscriptions::SubscriptionListResponse,
        routes::subscriptions::SyncResponse,
        routes::subscriptions::ToggleResponse,
        routes::profile::ProfileResponse,
        routes::oauth::CallbackResponse,
        tc_core::Video,
        tc_core::ThumbnailSet,
        tc_core::timeline::TimelinePosition,
    ))
)]
struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/timeline", get(routes::timeline::get_timeline))
        .route("/feed", get(routes::feed::get_feed))
        .route("/feed/refresh", post(routes::feed::refresh_feed))
        .route(
            "/subscriptions",
            get(routes::subscriptions::list_subscriptions),
        )
        .route(
            "/subscriptions/sync",
            post(routes::subscriptions::sync_subscriptions),
        )
        .route(
            "/subscriptions/{channel_id}/toggle",
            post(routes::subscriptions::toggle_subscription),
        )
        .route("/profile", get(routes::profile::get_profile))
        .route("/oauth2callback", get(routes::oauth::oauth_callback));

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving for UI build.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                tower_http::services::ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(tower_http::services::ServeFile::new(index_path)),
            );
        }
    }

    app
}
