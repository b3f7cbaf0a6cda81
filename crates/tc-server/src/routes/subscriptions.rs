//! Subscription route handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use tc_core::{ChannelId, ThumbnailSet};
use tc_db::pool::get_conn;
use tc_db::queries::subscriptions;

use crate::catalog;
use crate::context::AppContext;
use crate::error::AppError;

/// Subscription response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub channel_id: String,
    pub title: String,
    pub thumbnails: ThumbnailSet,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl SubscriptionResponse {
    fn from_model(sub: &tc_db::models::Subscription) -> Self {
        Self {
            channel_id: sub.channel_id.to_string(),
            title: sub.title.clone(),
            thumbnails: sub.thumbnails.clone(),
            enabled: sub.enabled,
            created_at: sub.created_at.clone(),
            updated_at: sub.updated_at.clone(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListResponse {
    pub items: Vec<SubscriptionResponse>,
    pub total_results: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Subscriptions imported or refreshed across all pages.
    pub synced: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub channel_id: String,
    pub enabled: bool,
}

/// GET /api/subscriptions
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = SubscriptionListResponse)
    )
)]
pub async fn list_subscriptions(
    State(ctx): State<AppContext>,
) -> Result<Json<SubscriptionListResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;
    let subs = subscriptions::list_subscriptions(&conn)?;
    let items: Vec<SubscriptionResponse> =
        subs.iter().map(SubscriptionResponse::from_model).collect();
    let total_results = items.len();
    Ok(Json(SubscriptionListResponse {
        items,
        total_results,
    }))
}

/// POST /api/subscriptions/sync
#[utoipa::path(
    post,
    path = "/api/subscriptions/sync",
    responses(
        (status = 200, description = "Subscriptions synced", body = SyncResponse),
        (status = 401, description = "No stored credentials"),
        (status = 502, description = "Upstream API failure")
    )
)]
pub async fn sync_subscriptions(
    State(ctx): State<AppContext>,
) -> Result<Json<SyncResponse>, AppError> {
    let outcome = catalog::sync_subscriptions(&ctx).await?;
    Ok(Json(SyncResponse {
        synced: outcome.synced,
    }))
}

/// POST /api/subscriptions/:channel_id/toggle
#[utoipa::path(
    post,
    path = "/api/subscriptions/{channel_id}/toggle",
    params(("channel_id" = String, Path, description = "Channel ID")),
    responses(
        (status = 200, description = "New enabled state", body = ToggleResponse),
        (status = 404, description = "Unknown channel")
    )
)]
pub async fn toggle_subscription(
    State(ctx): State<AppContext>,
    Path(channel_id): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let channel_id = ChannelId::new(channel_id);
    let conn = get_conn(&ctx.db)?;
    let enabled = subscriptions::toggle_enabled(&conn, &channel_id)?;
    Ok(Json(ToggleResponse {
        channel_id: channel_id.to_string(),
        enabled,
    }))
}
