//! # Codelink
//!
//! Links an external identity (an account on a messaging platform) to a
//! session identity (a player on a live interactive server) through a
//! one-time verification code.
//!
//! The external collaborator hands a code to the user and inserts a
//! matching `WAITING` row into the shared table. The user submits the code
//! in their live session; Codelink validates it against concurrency and
//! expiry constraints and atomically promotes the pending record to a
//! linked one — guaranteeing no two sessions claim the same external
//! identity and no session is linked twice.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use codelink::{LinkService, SessionId, StoreConfig};
//!
//! # async fn run() -> Result<(), codelink::StoreError> {
//! let config = StoreConfig::new("sqlite:verification.db");
//! let (service, mut reports) = LinkService::connect(&config).await?;
//!
//! // From the command surface (any task): fire and forget.
//! service.submit_code(SessionId::new("3fa2…"), "Steve".into(), "ABC123".into());
//!
//! // In the host's single-threaded authority loop: the only place
//! // allowed to touch session-visible state.
//! while let Some(report) = reports.recv().await {
//!     println!("{}: {}", report.session_id, report.outcome.user_message());
//! }
//! # Ok(())
//! # }
//! ```

mod service;

pub use codelink_store::{CompleteOutcome, RecordStore, StoreConfig, StoreError};
pub use codelink_types::{
    LinkOutcome, PendingRecord, RecordId, SessionId, VerificationStatus,
};
pub use codelink_verify::Verifier;
pub use service::{LinkReport, LinkService};
