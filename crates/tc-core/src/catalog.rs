//! Domain types for the video catalog.
//!
//! A [`Video`] is one playable unit in the linear channel. The catalog is the
//! ordered set of videos from enabled subscriptions, sorted ascending by
//! publish time; the timeline engine consumes it as-is and never re-sorts.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, VideoId};

/// A single labeled thumbnail reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Thumbnail {
    pub url: String,
}

/// The set of thumbnail sizes the platform provides for a video.
///
/// Not every size exists for every video; `standard` and `maxres` in
/// particular are frequently absent. The core never looks at these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ThumbnailSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxres: Option<Thumbnail>,
}

/// One playable unit in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Opaque external identifier, unique within the catalog.
    #[schema(value_type = String)]
    pub id: VideoId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub channel_id: ChannelId,
    pub channel_title: String,
    /// Epoch seconds; used only for catalog ordering, not for timeline math.
    pub published_at: i64,
    /// Length in whole seconds, >= 0. A zero-duration video occupies a
    /// zero-width slot and is only reachable as the past-the-end fallback.
    pub duration_secs: i64,
    #[serde(default)]
    pub thumbnails: ThumbnailSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_serializes_camel_case() {
        let video = Video {
            id: VideoId::new("abc"),
            title: "A title".into(),
            description: None,
            channel_id: ChannelId::new("UC1"),
            channel_title: "A channel".into(),
            published_at: 1_700_000_000,
            duration_secs: 120,
            thumbnails: ThumbnailSet::default(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["publishedAt"], 1_700_000_000);
        assert_eq!(json["durationSecs"], 120);
        assert_eq!(json["channelTitle"], "A channel");
    }

    #[test]
    fn thumbnail_set_tolerates_missing_sizes() {
        let set: ThumbnailSet =
            serde_json::from_str(r#"{"default": {"url": "http://img/d.jpg"}}"#).unwrap();
        assert_eq!(set.default.unwrap().url, "http://img/d.jpg");
        assert!(set.maxres.is_none());
    }
}
