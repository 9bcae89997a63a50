/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored collection could not be decoded (strict mode only).
    #[error("corrupt collection under {key:?}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Serialization failure while encoding a collection.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a host storage facility (e.g. `localStorage`).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A lock guarding an in-process store was poisoned.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
