//! Route handlers for the HTTP API.

pub mod feed;
pub mod health;
pub mod oauth;
pub mod profile;
pub mod subscriptions;
pub mod timeline;
