//! tc-db: SQLite persistence for subscriptions, the cached video feed, and
//! OAuth credentials.
//!
//! Connection pooling is handled by r2d2; schema migrations are embedded in
//! the binary and run on pool initialization.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
