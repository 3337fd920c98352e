//! Verification orchestrator for Codelink.
//!
//! This crate sequences the record store's three atomic operations into
//! the linking protocol and reports one of a closed set of outcomes:
//!
//! 1. Is this session already linked? A hit ends in `AlreadyLinked`.
//! 2. Does the code match a waiting, unexpired record? A miss ends in
//!    `CodeInvalid`.
//! 3. Promote the record, exactly once: `Success`, or `UpdateFailed` if
//!    the row changed underneath the attempt.
//!
//! A store failure at any step short-circuits the rest and terminates in
//! `SystemError`. [`Verifier::link`] is infallible by construction; every
//! path ends in a [`LinkOutcome`](codelink_types::LinkOutcome).
//!
//! The orchestrator runs pool-side. It must never touch session-visible
//! state itself; the facade crate hands its outcomes back to the host's
//! single-threaded authority context.

mod verifier;

pub use verifier::Verifier;
