//! Shared types for Codelink's account-linking protocol.
//!
//! Codelink connects an external identity (an account on a messaging
//! platform) to a session identity (a player on a live server) through a
//! one-time verification code. This crate defines the vocabulary every
//! other layer speaks:
//!
//! - **Identity types** — [`SessionId`], [`RecordId`]
//! - **Record types** — [`VerificationStatus`], [`PendingRecord`]
//! - **Protocol outcome** — [`LinkOutcome`], the closed set of results a
//!   linking attempt can produce
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)       ← submits codes, delivers outcomes to the host
//!     ↕
//! Orchestrator         ← sequences store calls, produces a LinkOutcome
//!     ↕
//! Record store (below) ← durable rows keyed by these types
//! ```

mod outcome;
mod record;

pub use outcome::LinkOutcome;
pub use record::{ParseStatusError, PendingRecord, RecordId, SessionId, VerificationStatus};
