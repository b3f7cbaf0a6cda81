//! Subscription table operations.

use chrono::Utc;
use rusqlite::Connection;
use tc_core::{ChannelId, Error, Result, ThumbnailSet};

use crate::models::Subscription;

const COLS: &str = "channel_id, title, thumbnails, enabled, created_at, updated_at";

/// Insert a subscription or refresh its title/thumbnails if it already
/// exists. The `enabled` flag of an existing row is left alone so a re-sync
/// never un-hides channels the user disabled.
pub fn upsert_subscription(
    conn: &Connection,
    channel_id: &ChannelId,
    title: &str,
    thumbnails: &ThumbnailSet,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let thumbnails_json =
        serde_json::to_string(thumbnails).map_err(|e| Error::Internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO subscriptions (channel_id, title, thumbnails, enabled, created_at, updated_at)
         VALUES (?1, ?2, ?3, 1, ?4, ?4)
         ON CONFLICT(channel_id) DO UPDATE SET
            title = excluded.title,
            thumbnails = excluded.thumbnails,
            updated_at = excluded.updated_at",
        rusqlite::params![channel_id.as_str(), title, thumbnails_json, &now],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Get a subscription by channel id.
pub fn get_subscription(conn: &Connection, channel_id: &ChannelId) -> Result<Option<Subscription>> {
    let q = format!("SELECT {COLS} FROM subscriptions WHERE channel_id = ?1");
    let result = conn.query_row(&q, [channel_id.as_str()], Subscription::from_row);
    match result {
        Ok(sub) => Ok(Some(sub)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every subscription, enabled or not, ordered by title.
pub fn list_subscriptions(conn: &Connection) -> Result<Vec<Subscription>> {
    let q = format!("SELECT {COLS} FROM subscriptions ORDER BY title");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Subscription::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// List only enabled subscriptions, ordered by title.
pub fn list_enabled(conn: &Connection) -> Result<Vec<Subscription>> {
    let q = format!("SELECT {COLS} FROM subscriptions WHERE enabled = 1 ORDER BY title");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Subscription::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Flip the `enabled` flag of a subscription and return the new state.
///
/// Unknown channels are an error, not a silent insert.
pub fn toggle_enabled(conn: &Connection, channel_id: &ChannelId) -> Result<bool> {
    let now = Utc::now().to_rfc3339();
    let n = conn
        .execute(
            "UPDATE subscriptions
             SET enabled = 1 - enabled, updated_at = ?2
             WHERE channel_id = ?1",
            rusqlite::params![channel_id.as_str(), &now],
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if n == 0 {
        return Err(Error::not_found("subscription", channel_id));
    }

    let enabled: i64 = conn
        .query_row(
            "SELECT enabled FROM subscriptions WHERE channel_id = ?1",
            [channel_id.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(enabled != 0)
}
