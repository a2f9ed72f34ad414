pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure kinds of the remote store. Callers that need to branch on a kind
/// (credential checks, conditional inserts) match on the variant; everything
/// else bubbles up through eyre.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `single()` query matched no row.
    #[error("no row matched the query")]
    NotFound,

    /// A `single()` query matched more than one row.
    #[error("multiple rows matched the query")]
    NotSingular,

    /// A uniqueness constraint rejected an insert.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The store could not be reached or answered with a server error.
    #[error("store request failed: {0}")]
    Backend(String),

    /// The store answered with a payload we could not decode.
    #[error("malformed store payload: {0}")]
    Malformed(String),
}
