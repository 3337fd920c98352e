//! The record store: three atomic operations over `player_verification`.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use codelink_types::{PendingRecord, RecordId, SessionId, VerificationStatus};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{StoreConfig, StoreError};

/// Result of the conditional completion update.
///
/// Distinguishing these at the store level (instead of a bare `bool`)
/// is what lets the orchestrator close the race between the advisory
/// pre-check and the write: a concurrent loser gets `SessionTaken`, not
/// a second success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
    /// Exactly one waiting row was promoted to linked.
    Updated,

    /// No waiting row with that id exists anymore — it was deleted, or
    /// another attempt consumed it first.
    NoMatch,

    /// The session already holds a linked row; the unique index on
    /// linked sessions rejected the write.
    SessionTaken,
}

/// Durable, concurrency-safe access to verification records.
///
/// Cheap to clone — it's a wrapper around the shared connection pool.
/// The pool is the only shared mutable resource in the system; every
/// operation acquires a connection, runs one statement, and releases the
/// connection, even on error (scoped acquisition inside sqlx).
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Opens the connection pool described by `config`.
    ///
    /// The pool is constructed and owned here, passed in by value to
    /// whoever holds the store — no process-wide singleton.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the URL is malformed or the
    /// initial connection fails.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            // Ride out short write contention instead of failing fast.
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(opts)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "record store pool opened"
        );

        Ok(Self { pool })
    }

    /// Creates the `player_verification` table and its indexes if absent.
    ///
    /// Two partial unique indexes carry the protocol's guarantees into
    /// the storage layer:
    /// - a code is unique while `WAITING` (one pending record per code)
    /// - a session is unique while `LINKED` (at most one linked row per
    ///   session, enforced even against racing writers)
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS player_verification (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT,\
                 discord_username TEXT NOT NULL,\
                 verification_code TEXT,\
                 status TEXT NOT NULL DEFAULT 'WAITING',\
                 minecraft_uuid TEXT,\
                 minecraft_ign TEXT,\
                 expires_at INTEGER NOT NULL\
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_verification_code_waiting \
             ON player_verification (verification_code) WHERE status = 'WAITING'",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_linked_session \
             ON player_verification (minecraft_uuid) WHERE status = 'LINKED'",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns `true` iff a linked row exists for this session.
    ///
    /// Absence is a normal `false`, never an error. A failure here means
    /// "unknown" — callers must not proceed with the protocol.
    pub async fn is_linked(&self, session: &SessionId) -> Result<bool, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM player_verification \
             WHERE minecraft_uuid = ? AND status = 'LINKED' LIMIT 1",
        )
        .bind(session.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Looks up the single waiting, unexpired record matching `code`.
    ///
    /// The expiry comparison binds a `now` computed *here*, so validity is
    /// always judged by the store tier's clock — a skewed caller clock
    /// can neither extend nor shorten a code's life.
    pub async fn lookup_pending(
        &self,
        code: &str,
    ) -> Result<Option<PendingRecord>, StoreError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT id, discord_username, status FROM player_verification \
             WHERE verification_code = ? AND status = 'WAITING' \
             AND expires_at > ? LIMIT 1",
        )
        .bind(code)
        .bind(unix_now())
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, external_username, status)) = row else {
            return Ok(None);
        };

        // The query filters on WAITING; any other value means the row
        // changed under us, which reads the same as "no match".
        let Ok(status) = VerificationStatus::from_str(&status) else {
            return Ok(None);
        };

        Ok(Some(PendingRecord {
            id: RecordId(id),
            external_username,
            status,
        }))
    }

    /// Promotes the waiting row `id` to linked: sets the session identity
    /// and display name, clears the code.
    ///
    /// The update is conditional on `status = 'WAITING'`, so a code can be
    /// consumed at most once even under concurrent attempts; the partial
    /// unique index on linked sessions turns a racing duplicate link into
    /// [`CompleteOutcome::SessionTaken`] instead of a second linked row.
    pub async fn complete_link(
        &self,
        id: RecordId,
        session: &SessionId,
        display_name: &str,
    ) -> Result<CompleteOutcome, StoreError> {
        let result = sqlx::query(
            "UPDATE player_verification \
             SET minecraft_uuid = ?, minecraft_ign = ?, \
                 status = 'LINKED', verification_code = NULL \
             WHERE id = ? AND status = 'WAITING'",
        )
        .bind(session.as_str())
        .bind(display_name)
        .bind(id.0)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(CompleteOutcome::Updated),
            Ok(_) => Ok(CompleteOutcome::NoMatch),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(CompleteOutcome::SessionTaken)
            }
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    /// The underlying pool. The external collaborator's row inserts and
    /// tests go through here; the linking core itself never does.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("record store pool closed");
    }
}

/// Seconds since the unix epoch, by this process's clock.
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
