//! Identity and record types shared by the store and the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable unique identifier for a player's session on the live server.
///
/// This is a newtype wrapper over the host's session UUID string. Wrapping
/// it keeps signatures honest — you can't hand a display name where a
/// session identity is expected just because both are strings.
///
/// `#[serde(transparent)]` serializes a `SessionId` as the plain inner
/// string, not as a one-field object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Creates a session identity from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice (for query binding).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The primary key of a verification record.
///
/// Assigned by the database when the external collaborator inserts the
/// row; this core only ever reads it back and passes it to the
/// conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// VerificationStatus
// ---------------------------------------------------------------------------

/// The lifecycle status of a verification record.
///
/// A two-state machine with a one-way transition:
///
/// ```text
///   Waiting ──(code consumed)──→ Linked
/// ```
///
/// There is no reverse edge — once linked, a record stays linked for the
/// lifetime of the system. Expiry is computed from `expires_at` at lookup
/// time, never stored as a status of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Record exists and its code may still be consumed (if unexpired).
    Waiting,

    /// Code was consumed; the record now carries the session identity.
    Linked,
}

impl VerificationStatus {
    /// The exact string stored in the `status` column.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Linked => "LINKED",
        }
    }

    /// Returns `true` if the record's code is still open for consumption.
    pub fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if the record has been claimed by a session.
    pub fn is_linked(self) -> bool {
        matches!(self, Self::Linked)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// The `status` column held a value this core doesn't know about.
#[derive(Debug, thiserror::Error)]
#[error("unknown verification status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for VerificationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "LINKED" => Ok(Self::Linked),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PendingRecord
// ---------------------------------------------------------------------------

/// The minimal projection of a `Waiting`, unexpired record returned by a
/// code lookup.
///
/// Deliberately thin: the orchestrator only needs the primary key (to
/// address the conditional update) and the external username (to echo in
/// the success outcome). The secret code itself is never read back out of
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    /// Primary key of the row, used for the completion update.
    pub id: RecordId,

    /// The messaging-platform identity that requested the link.
    pub external_username: String,

    /// Status at lookup time. Always `Waiting` — the lookup filters on
    /// it — but carried so callers never have to assume.
    pub status: VerificationStatus,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        // `#[serde(transparent)]` means SessionId("u1") → "u1", not {"0":"u1"}.
        let json = serde_json::to_string(&SessionId::new("u1")).unwrap();
        assert_eq!(json, "\"u1\"");
    }

    #[test]
    fn test_session_id_display_is_inner_string() {
        assert_eq!(SessionId::new("3fa2").to_string(), "3fa2");
    }

    #[test]
    fn test_record_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RecordId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId(7).to_string(), "V-7");
    }

    #[test]
    fn test_status_db_round_trip() {
        // The store writes as_db_str() and parses it back on read; the two
        // must agree or lookups would silently miss rows.
        for status in [VerificationStatus::Waiting, VerificationStatus::Linked] {
            assert_eq!(status.as_db_str().parse::<VerificationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_unknown_returns_error() {
        let err = "EXPIRED".parse::<VerificationStatus>();
        assert!(err.is_err(), "EXPIRED is computed, never stored");
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        // The JSON form matches the database form, so logs and rows agree.
        let json = serde_json::to_string(&VerificationStatus::Waiting).unwrap();
        assert_eq!(json, "\"WAITING\"");
        let json = serde_json::to_string(&VerificationStatus::Linked).unwrap();
        assert_eq!(json, "\"LINKED\"");
    }

    #[test]
    fn test_status_predicates() {
        assert!(VerificationStatus::Waiting.is_waiting());
        assert!(!VerificationStatus::Waiting.is_linked());
        assert!(VerificationStatus::Linked.is_linked());
        assert!(!VerificationStatus::Linked.is_waiting());
    }

    #[test]
    fn test_pending_record_round_trip() {
        let record = PendingRecord {
            id: RecordId(3),
            external_username: "alice".into(),
            status: VerificationStatus::Waiting,
        };
        let bytes = serde_json::to_vec(&record).unwrap();
        let decoded: PendingRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(record, decoded);
    }
}
