//! The command surface and the hand-off back to the authority context.
//!
//! The linking protocol runs on pool-side worker tasks, but only one
//! place in the host — its single-threaded authority context (the server
//! main loop) — is allowed to touch session-visible state. The bridge
//! between the two worlds is a channel, not a function call:
//!
//! ```text
//! command surface ──submit_code──→ worker task ──LinkReport──→ authority loop
//!    (any task)                    (pool-side)    (channel)    (single consumer)
//! ```
//!
//! If the authority context has already torn down (receiver dropped), a
//! finished report is discarded, never fatal.

use codelink_store::{RecordStore, StoreConfig, StoreError};
use codelink_types::{LinkOutcome, SessionId};
use codelink_verify::Verifier;
use tokio::sync::mpsc;

/// A completed linking attempt, delivered to the authority loop.
///
/// Carries enough for the host to route the fixed user-facing message
/// ([`LinkOutcome::user_message`]) to the right session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// The session that submitted the code.
    pub session_id: SessionId,

    /// The terminal outcome of the attempt.
    pub outcome: LinkOutcome,
}

/// The linking service: accepts code submissions, reports outcomes.
///
/// Cheap to clone; hand one to every place that accepts `/link` input.
/// All clones feed the single report receiver returned at construction.
#[derive(Clone)]
pub struct LinkService {
    verifier: Verifier,
    reports: mpsc::UnboundedSender<LinkReport>,
}

impl LinkService {
    /// Opens the record store, applies the schema, and builds the service.
    ///
    /// Returns the service and the report receiver. The receiver belongs
    /// to the authority context: move it into the host's main loop and
    /// consume reports there — nowhere else.
    pub async fn connect(
        config: &StoreConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<LinkReport>), StoreError> {
        let store = RecordStore::connect(config).await?;
        store.migrate().await?;
        Ok(Self::new(Verifier::new(store)))
    }

    /// Builds the service over an existing orchestrator.
    pub fn new(verifier: Verifier) -> (Self, mpsc::UnboundedReceiver<LinkReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                verifier,
                reports: tx,
            },
            rx,
        )
    }

    /// The orchestrator this service drives.
    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Submits a verification code for this session. Fire and forget.
    ///
    /// Returns immediately; the attempt runs on a spawned worker task
    /// (concurrency bounded by the store's connection pool) and its
    /// outcome arrives later as a [`LinkReport`] on the report channel.
    /// Must be called from within a Tokio runtime.
    pub fn submit_code(
        &self,
        session_id: SessionId,
        display_name: String,
        code: String,
    ) {
        let verifier = self.verifier.clone();
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let outcome = verifier.link(&session_id, &display_name, &code).await;
            // A closed channel means the authority context is gone
            // (shutdown). The database write, if any, already happened
            // and stands; only the user-visible message is lost.
            if reports.send(LinkReport { session_id, outcome }).is_err() {
                tracing::debug!("authority context gone, link report discarded");
            }
        });
    }

    /// Shuts down the underlying connection pool.
    pub async fn close(&self) {
        self.verifier.store().close().await;
    }
}
