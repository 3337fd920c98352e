//! Pooled record store for Codelink.
//!
//! This crate owns all durable state: a bounded connection pool over the
//! `player_verification` table, hidden behind three atomic operations:
//!
//! 1. **Existence check** — [`RecordStore::is_linked`]: is this session
//!    already linked?
//! 2. **Code lookup** — [`RecordStore::lookup_pending`]: does this code
//!    match a waiting, unexpired record?
//! 3. **Conditional update** — [`RecordStore::complete_link`]: promote a
//!    waiting record to linked, exactly once.
//!
//! Each operation is a single auto-committed statement on a connection
//! scoped to that call — the store never caches or holds connections
//! across operations. Pool exhaustion surfaces as
//! [`StoreError::Unavailable`] after the configured acquire timeout; it
//! never blocks indefinitely.
//!
//! Rows are *created* out of band by the external collaborator (the bot on
//! the messaging platform writes directly into the table). This crate only
//! ever reads and promotes them; it deletes nothing.

mod config;
mod error;
mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{CompleteOutcome, RecordStore};
