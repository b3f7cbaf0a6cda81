//! Cached video feed operations.
//!
//! [`list_catalog`] is the single read path the timeline consumes. It joins
//! against enabled subscriptions and orders `published_at ASC, id ASC`; that
//! ascending order is an invariant of the timeline accumulation algorithm and
//! is enforced here regardless of how the upstream API returned the items.

use chrono::Utc;
use rusqlite::Connection;
use tc_core::{Error, Result, Video};

use crate::models::VideoRow;

/// Insert a video or refresh its metadata if it already exists.
pub fn upsert_video(conn: &Connection, video: &Video) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let thumbnails_json =
        serde_json::to_string(&video.thumbnails).map_err(|e| Error::Internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO videos (id, channel_id, title, description, channel_title,
                             published_at, duration_secs, thumbnails, fetched_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            channel_title = excluded.channel_title,
            published_at = excluded.published_at,
            duration_secs = excluded.duration_secs,
            thumbnails = excluded.thumbnails,
            fetched_at = excluded.fetched_at",
        rusqlite::params![
            video.id.as_str(),
            video.channel_id.as_str(),
            video.title,
            video.description,
            video.channel_title,
            video.published_at,
            video.duration_secs,
            thumbnails_json,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Upsert a batch of videos inside a single transaction.
pub fn upsert_videos(conn: &mut Connection, videos: &[Video]) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    for video in videos {
        upsert_video(&tx, video)?;
    }
    tx.commit().map_err(|e| Error::database(e.to_string()))
}

/// The ordered catalog: videos from enabled subscriptions, ascending by
/// publish time with id as a deterministic tie-break.
pub fn list_catalog(conn: &Connection) -> Result<Vec<Video>> {
    let q = "SELECT v.id, v.channel_id, v.title, v.description, v.channel_title,
                    v.published_at, v.duration_secs, v.thumbnails, v.fetched_at
             FROM videos v
             JOIN subscriptions s ON s.channel_id = v.channel_id
             WHERE s.enabled = 1
             ORDER BY v.published_at ASC, v.id ASC";
    let mut stmt = conn.prepare(q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], VideoRow::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows.into_iter().map(VideoRow::into_video).collect())
}

/// Count all cached videos (enabled or not).
pub fn count_videos(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{get_conn, init_memory_pool};
    use crate::queries::subscriptions;
    use tc_core::{ChannelId, ThumbnailSet, VideoId};

    fn video(id: &str, channel: &str, published_at: i64, duration_secs: i64) -> Video {
        Video {
            id: VideoId::new(id),
            title: format!("video {id}"),
            description: None,
            channel_id: ChannelId::new(channel),
            channel_title: format!("channel {channel}"),
            published_at,
            duration_secs,
            thumbnails: ThumbnailSet::default(),
        }
    }

    fn subscribe(conn: &Connection, channel: &str) {
        subscriptions::upsert_subscription(
            conn,
            &ChannelId::new(channel),
            channel,
            &ThumbnailSet::default(),
        )
        .unwrap();
    }

    #[test]
    fn catalog_is_ascending_by_publish_time() {
        let pool = init_memory_pool().unwrap();
        let mut conn = get_conn(&pool).unwrap();
        subscribe(&conn, "UC1");

        let batch = vec![
            video("late", "UC1", 3000, 60),
            video("early", "UC1", 1000, 60),
            video("mid", "UC1", 2000, 60),
        ];
        upsert_videos(&mut conn, &batch).unwrap();

        let catalog = list_catalog(&conn).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["early", "mid", "late"]);
    }

    #[test]
    fn equal_publish_times_break_ties_by_id() {
        let pool = init_memory_pool().unwrap();
        let mut conn = get_conn(&pool).unwrap();
        subscribe(&conn, "UC1");

        upsert_videos(
            &mut conn,
            &[video("b", "UC1", 1000, 60), video("a", "UC1", 1000, 60)],
        )
        .unwrap();

        let catalog = list_catalog(&conn).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn catalog_excludes_disabled_channels() {
        let pool = init_memory_pool().unwrap();
        let mut conn = get_conn(&pool).unwrap();
        subscribe(&conn, "UC1");
        subscribe(&conn, "UC2");

        upsert_videos(
            &mut conn,
            &[video("v1", "UC1", 1000, 60), video("v2", "UC2", 2000, 60)],
        )
        .unwrap();

        subscriptions::toggle_enabled(&conn, &ChannelId::new("UC2")).unwrap();

        let catalog = list_catalog(&conn).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id.as_str(), "v1");

        // Disabled channels still count toward the raw cache.
        assert_eq!(count_videos(&conn).unwrap(), 2);
    }

    #[test]
    fn upsert_refreshes_metadata() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        subscribe(&conn, "UC1");

        upsert_video(&conn, &video("v1", "UC1", 1000, 60)).unwrap();
        let mut updated = video("v1", "UC1", 1000, 90);
        updated.title = "new title".into();
        upsert_video(&conn, &updated).unwrap();

        let catalog = list_catalog(&conn).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].duration_secs, 90);
        assert_eq!(catalog[0].title, "new title");
    }
}
