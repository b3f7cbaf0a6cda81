//! OAuth 2.0 token exchange and refresh.
//!
//! Talks to the provider's token endpoint to turn an authorization code into
//! a token set, and to renew access tokens from the stored refresh token.
//! Tokens are persisted in the `profiles` table; [`ensure_fresh_token`] is
//! the single entry point handlers use to obtain a usable access token.

use serde::Deserialize;

use tc_core::config::YouTubeConfig;
use tc_core::{Error, Result};
use tc_db::pool::get_conn;
use tc_db::queries::profiles;

use crate::context::AppContext;

/// Access tokens within this many seconds of expiry are refreshed eagerly,
/// so a token never expires mid-request.
const REFRESH_MARGIN_SECS: i64 = 300;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OAuthClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// The provider's token endpoint response. `refresh_token` is only present
/// on the initial exchange, not on renewals.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

impl OAuthClient {
    pub fn new(config: &YouTubeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Exchange an authorization code for a token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ])
        .await
    }

    /// Obtain a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::upstream("oauth", format!("token request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Unauthorized(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        resp.json::<TokenResponse>()
            .await
            .map_err(|e| Error::upstream("oauth", format!("token parse error: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Token lifecycle
// ---------------------------------------------------------------------------

/// Persist a token endpoint response, converting the relative `expires_in`
/// into an absolute epoch-seconds expiry.
pub fn store_token_response(ctx: &AppContext, tokens: &TokenResponse) -> Result<()> {
    let expiry = tokens
        .expires_in
        .map(|secs| chrono::Utc::now().timestamp() + secs);

    let conn = get_conn(&ctx.db)?;
    profiles::upsert_tokens(
        &conn,
        &tokens.access_token,
        tokens.refresh_token.as_deref(),
        expiry,
        tokens.token_type.as_deref(),
        tokens.scope.as_deref(),
    )
}

/// Return a currently valid access token, refreshing and re-persisting it
/// when the stored one is expired or about to expire.
///
/// Fails with `Unauthorized` when no tokens are stored at all, or when the
/// stored set is stale and carries no refresh token.
pub async fn ensure_fresh_token(ctx: &AppContext) -> Result<String> {
    let stored = {
        let conn = get_conn(&ctx.db)?;
        profiles::get_tokens(&conn)?
    };
    let Some(stored) = stored else {
        return Err(Error::Unauthorized(
            "no stored credentials; complete the OAuth flow first".into(),
        ));
    };

    let now = chrono::Utc::now().timestamp();
    let fresh = stored
        .expiry
        .is_some_and(|expiry| expiry - now > REFRESH_MARGIN_SECS);
    if fresh {
        return Ok(stored.access_token);
    }

    let Some(refresh_token) = stored.refresh_token.as_deref() else {
        return Err(Error::Unauthorized(
            "access token expired and no refresh token is stored".into(),
        ));
    };

    tracing::debug!("Access token stale; refreshing");
    let renewed = ctx.oauth.refresh(refresh_token).await?;
    store_token_response(ctx, &renewed)?;
    Ok(renewed.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_oauth_client(token_url: String) -> OAuthClient {
        let config = YouTubeConfig {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            token_url,
            ..Default::default()
        };
        OAuthClient::new(&config)
    }

    #[tokio::test]
    async fn exchange_sends_authorization_code_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-1",
                "expires_in": 3599,
                "refresh_token": "rt-1",
                "token_type": "Bearer",
                "scope": "youtube.readonly"
            })))
            .mount(&server)
            .await;

        let client = test_oauth_client(format!("{}/token", server.uri()));
        let tokens = client.exchange_code("abc123").await.unwrap();
        assert_eq!(tokens.access_token, "at-1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt-1"));
        assert_eq!(tokens.expires_in, Some(3599));
    }

    #[tokio::test]
    async fn refresh_sends_refresh_token_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-2",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;

        let client = test_oauth_client(format!("{}/token", server.uri()));
        let tokens = client.refresh("rt-1").await.unwrap();
        assert_eq!(tokens.access_token, "at-2");
        assert!(tokens.refresh_token.is_none());
    }

    #[tokio::test]
    async fn rejected_code_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let client = test_oauth_client(format!("{}/token", server.uri()));
        let err = client.exchange_code("bad").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }
}
