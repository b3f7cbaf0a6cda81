//! Query modules, one per table.

pub mod profiles;
pub mod subscriptions;
pub mod videos;
