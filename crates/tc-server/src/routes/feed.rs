//! Cached feed route handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use tc_core::Video;

use crate::catalog::{self, load_catalog};
use crate::context::AppContext;
use crate::error::AppError;

/// The cached catalog in broadcast order.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<Video>,
    pub total_results: usize,
}

/// Outcome of an explicit feed refresh.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Channels fetched successfully.
    pub channels: usize,
    /// Channels skipped because their fetch failed.
    pub skipped: usize,
    /// Videos upserted into the cache.
    pub videos: usize,
}

/// GET /api/feed
#[utoipa::path(
    get,
    path = "/api/feed",
    responses(
        (status = 200, description = "Cached catalog in broadcast order", body = FeedResponse)
    )
)]
pub async fn get_feed(State(ctx): State<AppContext>) -> Result<Json<FeedResponse>, AppError> {
    let items = load_catalog(&ctx)?;
    let total_results = items.len();
    Ok(Json(FeedResponse {
        items,
        total_results,
    }))
}

/// POST /api/feed/refresh
#[utoipa::path(
    post,
    path = "/api/feed/refresh",
    responses(
        (status = 200, description = "Feed refreshed", body = RefreshResponse),
        (status = 401, description = "No stored credentials"),
        (status = 502, description = "Upstream API failure")
    )
)]
pub async fn refresh_feed(
    State(ctx): State<AppContext>,
) -> Result<Json<RefreshResponse>, AppError> {
    let outcome = catalog::refresh_feed(&ctx).await?;
    Ok(Json(RefreshResponse {
        channels: outcome.channels,
        skipped: outcome.skipped,
        videos: outcome.videos,
    }))
}
