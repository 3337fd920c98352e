//! The linking protocol: three store operations chained into one outcome.

use codelink_store::{CompleteOutcome, RecordStore, StoreError};
use codelink_types::{LinkOutcome, PendingRecord, SessionId};

/// Sequences the linking protocol for one session at a time.
///
/// Cheap to clone (it wraps the pooled store), and safe to call from many
/// tasks concurrently — each call is an independent chain of store
/// operations, bounded by the connection pool underneath.
///
/// The pre-check in step 1 is advisory: two racing attempts for the same
/// session can both pass it. The guarantee that at most one wins lives in
/// the store (conditional update + unique index on linked sessions); the
/// orchestrator just maps the loser's result back to `AlreadyLinked`.
#[derive(Clone)]
pub struct Verifier {
    store: RecordStore,
}

impl Verifier {
    /// Creates an orchestrator over the given store.
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// The store this orchestrator runs against.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs one linking attempt to a terminal outcome.
    ///
    /// Never returns an error and never leaves the attempt unresolved:
    /// store failures are logged with full detail here and collapsed to
    /// [`LinkOutcome::SystemError`] for the caller. No retries — a failed
    /// attempt is surfaced once and the user may simply try again.
    pub async fn link(
        &self,
        session: &SessionId,
        display_name: &str,
        code: &str,
    ) -> LinkOutcome {
        // Step 1: idempotent re-link guard. If the session already holds
        // a linked record, stop before even looking at the code.
        match self.store.is_linked(session).await {
            Ok(true) => {
                tracing::debug!(%session, "link refused, session already linked");
                return LinkOutcome::AlreadyLinked;
            }
            Ok(false) => {}
            Err(e) => return system_error(session, "is_linked", &e),
        }

        // Step 2: code lookup. Missing, expired, and consumed codes are
        // indistinguishable from here on — all just "no match".
        let pending = match self.store.lookup_pending(code).await {
            Ok(Some(pending)) => pending,
            Ok(None) => {
                tracing::debug!(%session, "link refused, no matching pending code");
                return LinkOutcome::CodeInvalid;
            }
            Err(e) => return system_error(session, "lookup_pending", &e),
        };

        // Step 3: conditional promotion.
        match self.store.complete_link(pending.id, session, display_name).await {
            Ok(result) => completion_outcome(session, pending, result),
            Err(e) => system_error(session, "complete_link", &e),
        }
    }
}

/// Maps the conditional update's result to the attempt's outcome.
fn completion_outcome(
    session: &SessionId,
    pending: PendingRecord,
    result: CompleteOutcome,
) -> LinkOutcome {
    match result {
        CompleteOutcome::Updated => {
            tracing::info!(
                %session,
                record = %pending.id,
                external_username = %pending.external_username,
                "session linked"
            );
            LinkOutcome::Success {
                external_username: pending.external_username,
            }
        }
        CompleteOutcome::NoMatch => {
            // The record vanished or was consumed between lookup and
            // update. Nothing was written.
            tracing::warn!(%session, record = %pending.id, "completion matched no row");
            LinkOutcome::UpdateFailed
        }
        CompleteOutcome::SessionTaken => {
            // A concurrent attempt for this session won the race after
            // our advisory pre-check. Same answer as the pre-check.
            tracing::debug!(%session, "link refused, session linked concurrently");
            LinkOutcome::AlreadyLinked
        }
    }
}

/// Logs a store failure with full detail, returns the collapsed outcome.
fn system_error(session: &SessionId, step: &str, err: &StoreError) -> LinkOutcome {
    tracing::error!(%session, step, error = %err, "store unavailable during linking");
    LinkOutcome::SystemError
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the completion mapping.
    //!
    //! The `NoMatch` and `SessionTaken` results only arise end to end when
    //! another attempt mutates the row mid-protocol, which an integration
    //! test can only provoke nondeterministically. Mapping them here keeps
    //! every arm exercised on every run.

    use codelink_types::{RecordId, VerificationStatus};

    use super::*;

    fn pending(username: &str) -> PendingRecord {
        PendingRecord {
            id: RecordId(1),
            external_username: username.into(),
            status: VerificationStatus::Waiting,
        }
    }

    #[test]
    fn test_completion_outcome_updated_returns_success() {
        let outcome = completion_outcome(
            &SessionId::new("u1"),
            pending("alice"),
            CompleteOutcome::Updated,
        );

        assert_eq!(
            outcome,
            LinkOutcome::Success { external_username: "alice".into() }
        );
    }

    #[test]
    fn test_completion_outcome_no_match_returns_update_failed() {
        // The record was deleted or consumed between lookup and update.
        let outcome = completion_outcome(
            &SessionId::new("u1"),
            pending("alice"),
            CompleteOutcome::NoMatch,
        );

        assert_eq!(outcome, LinkOutcome::UpdateFailed);
    }

    #[test]
    fn test_completion_outcome_session_taken_returns_already_linked() {
        // The racing loser gets the same answer as the advisory pre-check.
        let outcome = completion_outcome(
            &SessionId::new("u1"),
            pending("alice"),
            CompleteOutcome::SessionTaken,
        );

        assert_eq!(outcome, LinkOutcome::AlreadyLinked);
    }
}
