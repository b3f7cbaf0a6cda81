//! tc-core: shared types, IDs, errors, configuration, and the timeline engine.
//!
//! This crate is the foundational dependency for the other tc-* crates. It
//! carries the domain types for the video catalog and the pure timeline
//! computation that maps a wall-clock epoch onto a playback position.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod timeline;

// Re-export the most commonly used items at the crate root.
pub use catalog::{ThumbnailSet, Video};
pub use error::{Error, Result};
pub use ids::{ChannelId, VideoId};
