//! Error types for vendhub storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
///
/// Every operation either fully succeeds or fails with exactly one of these;
/// the store performs no local recovery and no retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No machine row exists for the requested ID.
    #[error("machine not found: {machine_id}")]
    NotFound {
        /// The machine ID that had no matching row.
        machine_id: String,
    },

    /// The caller supplied a malformed desired-inventory entry.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend reported a transport or availability failure.
    #[error("backend error during {operation}: {message}")]
    Backend {
        /// The store operation that was running.
        operation: &'static str,
        /// The backend's error message.
        message: String,
    },

    /// A batch write chunk reported unprocessed operations.
    ///
    /// Chunks flushed before the failing one stay committed; nothing is
    /// retried.
    #[error("batch write during {operation} left {count} operations unprocessed")]
    Unprocessed {
        /// The store operation that was running.
        operation: &'static str,
        /// How many operations the backend did not apply.
        count: usize,
    },

    /// A stored row could not be decoded into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
