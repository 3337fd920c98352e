//! Error type for the record store.

/// Errors that can escape a store operation.
///
/// There is deliberately only one variant: to a caller, pool exhaustion, a
/// dead connection, and a failed query all mean the same thing — "the
/// answer is unknown, do not proceed". Callers never retry here; they
/// surface the failure once and let the user try again later.
///
/// "Not found" is **not** an error anywhere in this store. An absent row
/// is a normal `false` or `None`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The pool could not supply a connection in time, or the query
    /// itself failed. The wrapped error keeps full detail for logs.
    #[error("record store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}
