//! Timeline route handler.
//!
//! Resolves "what is airing right now" over the cached catalog. The
//! computation itself lives in [`tc_core::timeline`]; this handler only
//! loads the catalog, applies parameter defaults, and shapes the response.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use tc_core::timeline::{self, TimelinePosition};
use tc_core::Video;

use crate::catalog::load_catalog;
use crate::context::AppContext;
use crate::error::AppError;

/// Query parameters for the timeline resolution.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TimelineParams {
    /// Epoch seconds to resolve; defaults to the current time.
    pub epoch: Option<i64>,
    /// Broadcast start override; defaults to the configured start time.
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
}

/// Timeline response: the current position plus its neighbor window.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub current: TimelinePosition,
    pub before: Vec<Video>,
    pub after: Vec<Video>,
    /// True count of videos after the current one, not clipped to `after`.
    pub after_count: usize,
    /// Seconds elapsed since the broadcast start (negative before it).
    pub elapsed_seconds: i64,
    pub total_videos: usize,
}

/// GET /api/timeline
#[utoipa::path(
    get,
    path = "/api/timeline",
    params(TimelineParams),
    responses(
        (status = 200, description = "Current broadcast position", body = TimelineResponse),
        (status = 204, description = "Catalog is empty; refresh the feed first")
    )
)]
pub async fn get_timeline(
    State(ctx): State<AppContext>,
    Query(params): Query<TimelineParams>,
) -> Result<Response, AppError> {
    let catalog = load_catalog(&ctx)?;
    if catalog.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let epoch = params.epoch.unwrap_or_else(|| chrono::Utc::now().timestamp());
    let start_time = params.start_time.unwrap_or(ctx.config.timeline.start_time);

    // Non-empty catalog, so the fallback always yields a position.
    let Some(current) = timeline::resolve_with_fallback(&catalog, epoch, start_time) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let window = timeline::window(
        &catalog,
        &current,
        ctx.config.timeline.window_before,
        ctx.config.timeline.window_after,
    );

    let response = TimelineResponse {
        before: window.before,
        after: window.after,
        after_count: window.after_count,
        elapsed_seconds: epoch - start_time,
        total_videos: catalog.len(),
        current,
    };

    Ok(Json(response).into_response())
}
