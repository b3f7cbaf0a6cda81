//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use tc_core::{ChannelId, ThumbnailSet, Video, VideoId};

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Subscription {
    pub channel_id: ChannelId,
    pub title: String,
    pub thumbnails: ThumbnailSet,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Subscription {
    /// Build from a row selected as:
    /// channel_id, title, thumbnails, enabled, created_at, updated_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let thumbnails_json: String = row.get(2)?;
        Ok(Self {
            channel_id: ChannelId::new(row.get::<_, String>(0)?),
            title: row.get(1)?,
            thumbnails: serde_json::from_str(&thumbnails_json).unwrap_or_default(),
            enabled: row.get::<_, i64>(3)? != 0,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Video row
// ---------------------------------------------------------------------------

/// A cached feed entry. Converts into the domain [`Video`] the timeline
/// engine consumes.
#[derive(Debug, Clone)]
pub struct VideoRow {
    pub id: VideoId,
    pub channel_id: ChannelId,
    pub title: String,
    pub description: Option<String>,
    pub channel_title: String,
    pub published_at: i64,
    pub duration_secs: i64,
    pub thumbnails: ThumbnailSet,
    pub fetched_at: String,
}

impl VideoRow {
    /// Build from a row selected as:
    /// id, channel_id, title, description, channel_title, published_at,
    /// duration_secs, thumbnails, fetched_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let thumbnails_json: String = row.get(7)?;
        Ok(Self {
            id: VideoId::new(row.get::<_, String>(0)?),
            channel_id: ChannelId::new(row.get::<_, String>(1)?),
            title: row.get(2)?,
            description: row.get(3)?,
            channel_title: row.get(4)?,
            published_at: row.get(5)?,
            duration_secs: row.get(6)?,
            thumbnails: serde_json::from_str(&thumbnails_json).unwrap_or_default(),
            fetched_at: row.get(8)?,
        })
    }

    /// Convert into the domain type consumed by the timeline engine.
    pub fn into_video(self) -> Video {
        Video {
            id: self.id,
            title: self.title,
            description: self.description,
            channel_id: self.channel_id,
            channel_title: self.channel_title,
            published_at: self.published_at,
            duration_secs: self.duration_secs,
            thumbnails: self.thumbnails,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile / OAuth tokens
// ---------------------------------------------------------------------------

/// The stored OAuth credential set (single-row table).
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as epoch seconds, when the provider reported one.
    pub expiry: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub updated_at: String,
}

impl TokenSet {
    /// Build from a row selected as:
    /// access_token, refresh_token, expiry, token_type, scope, updated_at
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            access_token: row.get(0)?,
            refresh_token: row.get(1)?,
            expiry: row.get(2)?,
            token_type: row.get(3)?,
            scope: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}
