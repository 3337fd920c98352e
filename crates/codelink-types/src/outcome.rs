//! The closed set of results a linking attempt can produce.

use serde::{Deserialize, Serialize};

/// The terminal result of one linking attempt.
///
/// Every call into the orchestrator ends in exactly one of these five
/// variants — there is no "still pending" state and no error type that can
/// escape alongside it. The per-attempt state machine:
///
/// ```text
/// START
///   ──already linked──→ AlreadyLinked
///   ──lookup miss─────→ CodeInvalid
///   ──update no-op────→ UpdateFailed
///   ──update applied──→ Success
///   ──store failure───→ SystemError   (from any step)
/// ```
///
/// `CodeInvalid` deliberately collapses its causes (never existed, wrong
/// status, expired, already consumed) so a caller probing codes learns
/// nothing about why one failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LinkOutcome {
    /// This session already holds a linked record. No lookup was performed.
    AlreadyLinked,

    /// No waiting, unexpired record matched the submitted code.
    CodeInvalid,

    /// The record was promoted to linked and its code cleared.
    Success {
        /// The external identity the session is now linked to.
        external_username: String,
    },

    /// The conditional update matched zero rows — the record vanished or
    /// changed between lookup and completion.
    UpdateFailed,

    /// The record store was unavailable at some step. The caller may try
    /// again later; nothing was written.
    SystemError,
}

impl LinkOutcome {
    /// The fixed user-facing message for this outcome.
    ///
    /// One message per variant, 1:1. No internal detail (error text, which
    /// step failed, why a code was invalid) ever reaches the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyLinked => "Your account is already linked.".to_string(),
            Self::CodeInvalid => {
                "Verification code is invalid or has expired.".to_string()
            }
            Self::Success { external_username } => {
                format!("Verification successful! Your account is now linked to @{external_username}.")
            }
            Self::UpdateFailed => "Could not complete the link. Please request a new code.".to_string(),
            Self::SystemError => {
                "Something went wrong while verifying. Please try again later.".to_string()
            }
        }
    }
}
