//! Store configuration: the pool knobs the host is expected to expose.

use std::time::Duration;

/// Configuration for the record store's connection pool.
///
/// The host's config layer (file, env, whatever) produces one of these;
/// only the resulting values matter here. Host, port, database name, and
/// credentials all collapse into `database_url`, which is the idiomatic
/// sqlx shape for "where is the database".
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database URL, e.g. `sqlite:verification.db` or `sqlite::memory:`.
    pub database_url: String,

    /// Maximum number of pooled connections. This also bounds how many
    /// linking attempts can have a database round trip in flight at once.
    pub max_connections: u32,

    /// How long an operation waits for a free connection before giving up
    /// with [`StoreError::Unavailable`](crate::StoreError::Unavailable).
    pub acquire_timeout: Duration,

    /// Maximum lifetime of a pooled connection before it is recycled.
    pub max_lifetime: Duration,
}

impl StoreConfig {
    /// Creates a config for the given database URL with default pool
    /// settings: 10 connections, 30s acquire timeout, 30min max lifetime.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}
