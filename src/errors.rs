//! Error handling for the vote ledger
//!
//! The taxonomy separates user-correctable failures (`AlreadyVoted`,
//! validation) from precondition failures (election state), transient
//! storage faults the caller may retry, and chain integrity violations
//! which are fatal for the affected election.

use uuid::Uuid;

/// Result type alias for the vote ledger
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the vote ledger
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The voter has already cast a vote in this election
    #[error("Voter has already cast a vote in this election")]
    AlreadyVoted,

    /// No election exists with the given identifier
    #[error("Election not found")]
    ElectionNotFound,

    /// The election exists but is not accepting votes
    #[error("Election is not accepting votes")]
    ElectionInactive,

    /// The hash chain for an election failed verification.
    ///
    /// Fatal for that election: further reads and writes against its chain
    /// are refused until an operator intervenes.
    #[error("Chain integrity violation in election {election_id} at block {index}")]
    ChainIntegrityViolation { election_id: Uuid, index: u64 },

    /// Transient storage failure; the caller may retry the whole operation
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// The caller-supplied deadline expired before the operation completed
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Validation errors
    #[error("Validation failed: {field}")]
    Validation { field: String },

    /// The authenticated identity lacks the required role
    #[error("Unauthorized: {action}")]
    Unauthorized { action: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(action: impl Into<String>) -> Self {
        Self::Unauthorized {
            action: action.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation can succeed.
    ///
    /// Only transient storage faults qualify; the ledger itself never
    /// retries internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ledger_error {
    ($msg:expr) => {
        $crate::Error::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::internal(format!($fmt, $($arg)*))
    };
}
