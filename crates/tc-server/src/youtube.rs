//! YouTube Data API v3 client.
//!
//! Provides the three calls the catalog needs: the authenticated user's
//! subscription pages, the most recent uploads of a channel, and video
//! durations. Rate-limited with a token bucket to stay under API quotas.
//!
//! Responses are schema-validated at this boundary: items missing an id, a
//! publish time, or snippet fields are skipped with a warning instead of
//! being forwarded into the catalog.

use std::collections::HashMap;
use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use tc_core::config::YouTubeConfig;
use tc_core::{ChannelId, Error, Result, ThumbnailSet, Video, VideoId};

/// How many video ids fit into a single `videos.list` call.
const MAX_IDS_PER_DURATION_CALL: usize = 50;

/// Page size for `subscriptions.list`.
const SUBSCRIPTIONS_PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap());
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(quota),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.limiter.until_ready().await;

        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::upstream("youtube", format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream("youtube", format!("{status}: {body}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| Error::upstream("youtube", format!("parse error: {e}")))
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Fetch one page of the authenticated user's subscriptions.
    pub async fn list_subscriptions_page(
        &self,
        access_token: &str,
        page_token: Option<&str>,
    ) -> Result<SubscriptionsPage> {
        let max_results = SUBSCRIPTIONS_PAGE_SIZE.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("mine", "true"),
            ("maxResults", &max_results),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let raw: RawSubscriptionsResponse =
            self.get(access_token, "/subscriptions", &params).await?;

        let items = raw
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                let channel_id = snippet.resource_id.and_then(|r| r.channel_id)?;
                Some(SubscriptionItem {
                    channel_id: ChannelId::new(channel_id),
                    title: snippet.title.unwrap_or_default(),
                    thumbnails: snippet.thumbnails.unwrap_or_default(),
                })
            })
            .collect();

        Ok(SubscriptionsPage {
            items,
            next_page_token: raw.next_page_token,
        })
    }

    // -----------------------------------------------------------------------
    // Channel uploads
    // -----------------------------------------------------------------------

    /// Fetch the most recent uploads of a channel, newest first, without
    /// durations (those come from [`video_durations`](Self::video_durations)).
    ///
    /// Malformed items are skipped with a warning.
    pub async fn list_channel_uploads(
        &self,
        access_token: &str,
        channel_id: &ChannelId,
        max_results: u32,
    ) -> Result<Vec<Video>> {
        let max_results = max_results.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("channelId", channel_id.as_str()),
            ("type", "video"),
            ("order", "date"),
            ("maxResults", &max_results),
        ];

        let raw: RawSearchResponse = self.get(access_token, "/search", &params).await?;

        let mut videos = Vec::with_capacity(raw.items.len());
        for item in raw.items {
            match validate_search_item(item) {
                Some(video) => videos.push(video),
                None => {
                    tracing::warn!(
                        channel = %channel_id,
                        "Skipping malformed search result from YouTube"
                    );
                }
            }
        }
        Ok(videos)
    }

    // -----------------------------------------------------------------------
    // Durations
    // -----------------------------------------------------------------------

    /// Resolve durations (in whole seconds) for a set of video ids.
    ///
    /// Ids the API does not return, or whose duration fails to parse, are
    /// simply absent from the map; callers fall back to 0.
    pub async fn video_durations(
        &self,
        access_token: &str,
        ids: &[VideoId],
    ) -> Result<HashMap<String, i64>> {
        let mut durations = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_DURATION_CALL) {
            let joined = chunk
                .iter()
                .map(VideoId::as_str)
                .collect::<Vec<_>>()
                .join(",");
            let params: Vec<(&str, &str)> = vec![("part", "contentDetails"), ("id", &joined)];

            let raw: RawVideoListResponse = self.get(access_token, "/videos", &params).await?;
            for item in raw.items {
                let (Some(id), Some(details)) = (item.id, item.content_details) else {
                    continue;
                };
                if let Some(duration) = details.duration.as_deref() {
                    durations.insert(id, parse_iso8601_duration(duration));
                }
            }
        }

        Ok(durations)
    }
}

// ---------------------------------------------------------------------------
// Validated output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SubscriptionItem {
    pub channel_id: ChannelId,
    pub title: String,
    pub thumbnails: ThumbnailSet,
}

#[derive(Debug, Clone)]
pub struct SubscriptionsPage {
    pub items: Vec<SubscriptionItem>,
    pub next_page_token: Option<String>,
}

/// Turn a raw search result into a validated [`Video`], or `None` when a
/// required field is missing. The duration starts at 0 and is filled in from
/// the videos.list call.
fn validate_search_item(item: RawSearchItem) -> Option<Video> {
    let video_id = item.id.and_then(|id| id.video_id)?;
    let snippet = item.snippet?;
    let published_at = parse_published_at(snippet.published_at.as_deref()?)?;

    Some(Video {
        id: VideoId::new(video_id),
        title: snippet.title.unwrap_or_default(),
        description: snippet.description,
        channel_id: ChannelId::new(snippet.channel_id?),
        channel_title: snippet.channel_title.unwrap_or_default(),
        published_at,
        duration_secs: 0,
        thumbnails: snippet.thumbnails.unwrap_or_default(),
    })
}

/// Parse an RFC 3339 publish time into epoch seconds.
fn parse_published_at(raw: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Parse an ISO-8601 duration of the `PT#H#M#S` form into whole seconds.
///
/// Anything that does not match that shape (including day-bearing durations,
/// which the platform does not emit for regular uploads) parses as 0, the
/// same degenerate value a missing duration gets.
pub fn parse_iso8601_duration(raw: &str) -> i64 {
    let Some(rest) = raw.strip_prefix("PT") else {
        return 0;
    };

    let mut total: i64 = 0;
    let mut number: i64 = 0;
    let mut has_digits = false;

    // Checked arithmetic throughout: an overflowing component is malformed
    // input and degrades to 0 like any other unparseable duration.
    for c in rest.chars() {
        match c {
            '0'..='9' => {
                let digit = i64::from(c as u8 - b'0');
                number = match number.checked_mul(10).and_then(|n| n.checked_add(digit)) {
                    Some(n) => n,
                    None => return 0,
                };
                has_digits = true;
            }
            'H' if has_digits => {
                total = match number.checked_mul(3600).and_then(|n| total.checked_add(n)) {
                    Some(t) => t,
                    None => return 0,
                };
                number = 0;
                has_digits = false;
            }
            'M' if has_digits => {
                total = match number.checked_mul(60).and_then(|n| total.checked_add(n)) {
                    Some(t) => t,
                    None => return 0,
                };
                number = 0;
                has_digits = false;
            }
            'S' if has_digits => {
                total = match total.checked_add(number) {
                    Some(t) => t,
                    None => return 0,
                };
                number = 0;
                has_digits = false;
            }
            _ => return 0,
        }
    }

    total
}

// ---------------------------------------------------------------------------
// Raw API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSubscriptionsResponse {
    #[serde(default)]
    items: Vec<RawSubscriptionItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSubscriptionItem {
    snippet: Option<RawSubscriptionSnippet>,
}

#[derive(Debug, Deserialize)]
struct RawSubscriptionSnippet {
    title: Option<String>,
    #[serde(rename = "resourceId")]
    resource_id: Option<RawResourceId>,
    thumbnails: Option<ThumbnailSet>,
}

#[derive(Debug, Deserialize)]
struct RawResourceId {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    items: Vec<RawSearchItem>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    id: Option<RawSearchId>,
    snippet: Option<RawSearchSnippet>,
}

#[derive(Debug, Deserialize)]
struct RawSearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchSnippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    thumbnails: Option<ThumbnailSet>,
}

#[derive(Debug, Deserialize)]
struct RawVideoListResponse {
    #[serde(default)]
    items: Vec<RawVideoListItem>,
}

#[derive(Debug, Deserialize)]
struct RawVideoListItem {
    id: Option<String>,
    #[serde(rename = "contentDetails")]
    content_details: Option<RawContentDetails>,
}

#[derive(Debug, Deserialize)]
struct RawContentDetails {
    duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn duration_hours_minutes_seconds() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration("PT4M13S"), 253);
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT2H"), 7200);
        assert_eq!(parse_iso8601_duration("PT10M"), 600);
    }

    #[test]
    fn duration_malformed_is_zero() {
        assert_eq!(parse_iso8601_duration(""), 0);
        assert_eq!(parse_iso8601_duration("4m13s"), 0);
        assert_eq!(parse_iso8601_duration("PTXS"), 0);
        // Day-bearing durations fall outside the PT shape.
        assert_eq!(parse_iso8601_duration("P1DT2H"), 0);
    }

    #[test]
    fn duration_with_overflowing_component_is_zero() {
        assert_eq!(parse_iso8601_duration("PT99999999999999999999S"), 0);
        assert_eq!(parse_iso8601_duration("PT9223372036854775807H"), 0);
    }

    #[test]
    fn duration_zero_is_zero() {
        assert_eq!(parse_iso8601_duration("PT0S"), 0);
    }

    #[test]
    fn published_at_parses_rfc3339() {
        assert_eq!(
            parse_published_at("1970-01-01T00:00:00Z"),
            Some(0)
        );
        assert_eq!(
            parse_published_at("2023-11-14T22:13:20Z"),
            Some(1_700_000_000)
        );
        assert_eq!(parse_published_at("yesterday"), None);
    }

    #[test]
    fn search_item_without_video_id_is_rejected() {
        let item = RawSearchItem {
            id: Some(RawSearchId { video_id: None }),
            snippet: None,
        };
        assert!(validate_search_item(item).is_none());
    }

    fn test_client(base_url: &str) -> YouTubeClient {
        let config = tc_core::config::YouTubeConfig {
            api_base_url: base_url.to_string(),
            ..Default::default()
        };
        YouTubeClient::new(&config)
    }

    #[tokio::test]
    async fn channel_uploads_skip_malformed_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("channelId", "UC1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": {"videoId": "vid1"},
                        "snippet": {
                            "title": "Good",
                            "publishedAt": "2023-11-14T22:13:20Z",
                            "channelId": "UC1",
                            "channelTitle": "Channel One"
                        }
                    },
                    {
                        // No videoId: must be skipped.
                        "id": {"kind": "youtube#channel"},
                        "snippet": {"title": "Bad"}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let videos = client
            .list_channel_uploads("token", &ChannelId::new("UC1"), 5)
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id.as_str(), "vid1");
        assert_eq!(videos[0].published_at, 1_700_000_000);
        assert_eq!(videos[0].duration_secs, 0);
    }

    #[tokio::test]
    async fn durations_are_parsed_per_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "vid1", "contentDetails": {"duration": "PT4M13S"}},
                    {"id": "vid2", "contentDetails": {"duration": "PT1H"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let durations = client
            .video_durations("token", &[VideoId::new("vid1"), VideoId::new("vid2")])
            .await
            .unwrap();

        assert_eq!(durations.get("vid1"), Some(&253));
        assert_eq!(durations.get("vid2"), Some(&3600));
    }

    #[tokio::test]
    async fn upstream_error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .list_subscriptions_page("token", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
        assert!(err.to_string().contains("quotaExceeded"));
    }
}
