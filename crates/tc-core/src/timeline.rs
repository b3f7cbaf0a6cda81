//! The timeline engine: maps a wall-clock epoch onto a playback position
//! inside an ordered, back-to-back concatenation of videos.
//!
//! Given a catalog sorted ascending by publish time and a fixed broadcast
//! start time, the engine computes which video is "airing" at a given epoch,
//! the offset into it, and a bounded window of neighbors. Every operation is
//! a pure computation over its inputs: no I/O, no state, safe to call
//! concurrently from any number of tasks.
//!
//! All arithmetic is integer seconds. The engine raises no errors; "failure"
//! is the `None` returned by [`locate`] past the catalog end (absorbed by
//! [`resolve_with_fallback`]) and the empty-catalog precondition callers must
//! check before resolving.

use serde::Serialize;

use crate::catalog::Video;
use crate::ids::VideoId;

/// A resolved playback position: the video airing at the queried epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePosition {
    /// Identifier of the current video.
    #[schema(value_type = String)]
    pub video_id: VideoId,
    /// Seconds into the current video. Always in `[0, duration)` when the
    /// epoch is inside the catalog; negative when the epoch precedes the
    /// broadcast start (see [`locate`]).
    pub timestamp: i64,
    /// The current video record.
    pub video: Video,
    /// Index of the current video in the catalog.
    pub current_index: usize,
}

/// A bounded window of neighbors around a resolved position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    /// Up to `before` videos preceding the current one, in catalog order.
    pub before: Vec<Video>,
    /// Up to `after` videos following the current one, in catalog order.
    pub after: Vec<Video>,
    /// True count of all videos strictly after the current one, independent
    /// of window clipping.
    pub after_count: usize,
}

/// Find the video airing at `epoch`, given a broadcast that plays `videos`
/// back-to-back starting at `start_time`.
///
/// Walks the catalog in order, accumulating durations, and returns the first
/// video whose cumulative interval contains `epoch - start_time`. Returns
/// `None` when the elapsed time is at or past the total catalog duration
/// (or the catalog is empty).
///
/// Zero-duration videos can never contain an elapsed instant, so the forward
/// search skips over them; they are reachable only through the fallback in
/// [`resolve_with_fallback`].
///
/// An epoch before `start_time` resolves to index 0 with a *negative*
/// timestamp. That mirrors the reference implementation verbatim; callers
/// that want pre-start epochs clamped to offset 0 must do so themselves.
pub fn locate(videos: &[Video], epoch: i64, start_time: i64) -> Option<TimelinePosition> {
    let elapsed_seconds = epoch - start_time;

    let mut accumulated_time = 0i64;
    for (i, video) in videos.iter().enumerate() {
        let video_end_time = accumulated_time + video.duration_secs;

        if elapsed_seconds < video_end_time {
            return Some(TimelinePosition {
                video_id: video.id.clone(),
                timestamp: elapsed_seconds - accumulated_time,
                video: video.clone(),
                current_index: i,
            });
        }

        accumulated_time = video_end_time;
    }

    None
}

/// Resolve a position, parking on the last video when the epoch is past the
/// catalog end.
///
/// Returns `None` only for an empty catalog; callers are expected to have
/// short-circuited that case into a "no content, refresh needed" signal
/// before getting here.
pub fn resolve_with_fallback(
    videos: &[Video],
    epoch: i64,
    start_time: i64,
) -> Option<TimelinePosition> {
    if let Some(position) = locate(videos, epoch, start_time) {
        return Some(position);
    }

    let last = videos.last()?;
    Some(TimelinePosition {
        video_id: last.id.clone(),
        timestamp: 0,
        video: last.clone(),
        current_index: videos.len() - 1,
    })
}

/// Slice a bounded neighbor window around `position`.
///
/// `before` and `after` bound the returned slices; indices are clamped at the
/// catalog edges and the current video is never included. `after_count` is
/// the true remaining count, which may exceed `after.len()`.
pub fn window(
    videos: &[Video],
    position: &TimelinePosition,
    before: usize,
    after: usize,
) -> TimelineWindow {
    let before_start = position.current_index.saturating_sub(before);
    let after_end = videos.len().min(position.current_index + after + 1);

    TimelineWindow {
        before: videos[before_start..position.current_index].to_vec(),
        after: videos[position.current_index + 1..after_end].to_vec(),
        after_count: videos.len() - position.current_index - 1,
    }
}
