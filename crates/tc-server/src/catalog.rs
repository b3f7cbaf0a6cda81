//! Catalog orchestration: subscription sync and feed refresh.
//!
//! These functions sit between the HTTP handlers and the YouTube client.
//! They own the multi-call workflows (pagination, per-channel fan-out,
//! duration back-fill) and persist the results through `tc_db`.

use tc_core::{Result, Video, VideoId};
use tc_db::pool::get_conn;
use tc_db::queries::{subscriptions, videos};

use crate::context::AppContext;
use crate::oauth::ensure_fresh_token;

/// Outcome of a subscription sync run.
#[derive(Debug, Clone, Copy)]
pub struct SyncOutcome {
    /// Total subscriptions upserted across all pages.
    pub synced: usize,
}

/// Outcome of a feed refresh run.
#[derive(Debug, Clone, Copy)]
pub struct RefreshOutcome {
    /// Enabled channels that were fetched successfully.
    pub channels: usize,
    /// Channels whose fetch failed and were skipped.
    pub skipped: usize,
    /// Videos upserted into the cache.
    pub videos: usize,
}

/// The ordered catalog the timeline runs over.
pub fn load_catalog(ctx: &AppContext) -> Result<Vec<Video>> {
    let conn = get_conn(&ctx.db)?;
    videos::list_catalog(&conn)
}

/// Pull the authenticated user's full subscription list (all pages) and
/// upsert it. Channels already disabled locally stay disabled.
pub async fn sync_subscriptions(ctx: &AppContext) -> Result<SyncOutcome> {
    let access_token = ensure_fresh_token(ctx).await?;

    let mut synced = 0;
    let mut page_token: Option<String> = None;

    loop {
        let page = ctx
            .youtube
            .list_subscriptions_page(&access_token, page_token.as_deref())
            .await?;

        {
            let conn = get_conn(&ctx.db)?;
            for item in &page.items {
                subscriptions::upsert_subscription(
                    &conn,
                    &item.channel_id,
                    &item.title,
                    &item.thumbnails,
                )?;
                synced += 1;
            }
        }

        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }

    tracing::info!(synced, "Subscription sync complete");
    Ok(SyncOutcome { synced })
}

/// Fetch recent uploads for every enabled subscription and cache them.
///
/// A channel whose fetch fails is logged and skipped rather than aborting
/// the whole run; one flaky channel must not empty the broadcast.
pub async fn refresh_feed(ctx: &AppContext) -> Result<RefreshOutcome> {
    let access_token = ensure_fresh_token(ctx).await?;

    let enabled = {
        let conn = get_conn(&ctx.db)?;
        subscriptions::list_enabled(&conn)?
    };

    let per_channel = ctx.config.youtube.uploads_per_channel;
    let mut fetched: Vec<Video> = Vec::new();
    let mut channels = 0;
    let mut skipped = 0;

    for sub in &enabled {
        match ctx
            .youtube
            .list_channel_uploads(&access_token, &sub.channel_id, per_channel)
            .await
        {
            Ok(uploads) => {
                fetched.extend(uploads);
                channels += 1;
            }
            Err(e) => {
                tracing::warn!(
                    channel = %sub.channel_id,
                    error = %e,
                    "Skipping channel during feed refresh"
                );
                skipped += 1;
            }
        }
    }

    if !fetched.is_empty() {
        let ids: Vec<VideoId> = fetched.iter().map(|v| v.id.clone()).collect();
        let durations = ctx.youtube.video_durations(&access_token, &ids).await?;
        for video in &mut fetched {
            video.duration_secs = durations.get(video.id.as_str()).copied().unwrap_or(0);
        }

        let mut conn = get_conn(&ctx.db)?;
        videos::upsert_videos(&mut conn, &fetched)?;
    }

    tracing::info!(
        channels,
        skipped,
        videos = fetched.len(),
        "Feed refresh complete"
    );
    Ok(RefreshOutcome {
        channels,
        skipped,
        videos: fetched.len(),
    })
}
