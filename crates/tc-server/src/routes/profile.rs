//! Profile route handler.
//!
//! Reports credential status only. Raw token values never leave the server.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use tc_db::pool::get_conn;
use tc_db::queries::profiles;

use crate::context::AppContext;
use crate::error::AppError;

/// Sanitized credential status.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// True when a credential set is stored.
    pub connected: bool,
    /// True when the stored set can be refreshed after expiry.
    pub refreshable: bool,
    /// Access token expiry as epoch seconds, when known.
    pub expiry: Option<i64>,
    pub scope: Option<String>,
    pub updated_at: Option<String>,
}

/// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Credential status", body = ProfileResponse)
    )
)]
pub async fn get_profile(
    State(ctx): State<AppContext>,
) -> Result<Json<ProfileResponse>, AppError> {
    let conn = get_conn(&ctx.db)?;
    let response = match profiles::get_tokens(&conn)? {
        Some(tokens) => ProfileResponse {
            connected: true,
            refreshable: tokens.refresh_token.is_some(),
            expiry: tokens.expiry,
            scope: tokens.scope,
            updated_at: Some(tokens.updated_at),
        },
        None => ProfileResponse {
            connected: false,
            refreshable: false,
            expiry: None,
            scope: None,
            updated_at: None,
        },
    };
    Ok(Json(response))
}
