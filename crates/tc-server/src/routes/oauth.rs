//! OAuth callback route handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use tc_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::oauth::store_token_response;

/// Callback query parameters. The provider sends either `code` or `error`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CallbackResponse {
    pub status: &'static str,
}

/// GET /api/oauth2callback
#[utoipa::path(
    get,
    path = "/api/oauth2callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Tokens stored", body = CallbackResponse),
        (status = 400, description = "Missing or denied authorization code"),
        (status = 401, description = "Code rejected by the provider")
    )
)]
pub async fn oauth_callback(
    State(ctx): State<AppContext>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackResponse>, AppError> {
    if let Some(error) = params.error {
        return Err(Error::Validation(format!("authorization denied: {error}")).into());
    }
    let Some(code) = params.code else {
        return Err(Error::Validation("missing authorization code".into()).into());
    };

    let tokens = ctx.oauth.exchange_code(&code).await?;
    store_token_response(&ctx, &tokens)?;
    tracing::info!("OAuth credentials stored");

    Ok(Json(CallbackResponse {
        status: "connected",
    }))
}
