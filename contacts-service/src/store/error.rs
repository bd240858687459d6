//! Store error types
//!
//! Structured errors for contact store operations. Errors coming from SurrealDB
//! are classified by message so callers can tell a unique-index violation apart
//! from an unreachable database.
//!
//! # Example
//!
//! ```rust
//! use contacts_service::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let kind = StoreErrorKind::classify(
//!     "Database index `contact_mobile_unique` already contains '555-0100'",
//! );
//! assert_eq!(kind, StoreErrorKind::AlreadyExists);
//!
//! let error = StoreError::new(StoreOperation::Insert, kind, "duplicate mobile");
//! assert!(!error.is_retriable());
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Opening the connection and selecting namespace/database
    Connect,
    /// Applying table, field and index definitions
    DefineSchema,
    /// Inserting a new contact
    Insert,
    /// Looking up a contact by field value
    FindByField,
    /// Listing all contacts
    FindAll,
    /// Looking up a contact by id
    FindById,
    /// Replacing the fields of a contact
    Replace,
    /// Deleting a contact
    Delete,
    /// Health probe
    Ping,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::DefineSchema => write!(f, "define_schema"),
            Self::Insert => write!(f, "insert"),
            Self::FindByField => write!(f, "find_by_field"),
            Self::FindAll => write!(f, "find_all"),
            Self::FindById => write!(f, "find_by_id"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "delete"),
            Self::Ping => write!(f, "ping"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// A unique index already holds the value
    AlreadyExists,
    /// Another transaction committed a conflicting write first
    TransactionConflict,
    /// Failed to reach the database
    ConnectionFailed,
    /// Credentials were rejected
    AuthenticationFailed,
    /// Operation timed out
    Timeout,
    /// Query was rejected or failed to execute
    QueryFailed,
    /// Result could not be decoded
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::TransactionConflict => write!(f, "transaction_conflict"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::AuthenticationFailed => write!(f, "authentication_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl StoreErrorKind {
    /// Categorize a SurrealDB error message
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("already contains")
            || lower.contains("already exists")
            || lower.contains("duplicate")
        {
            Self::AlreadyExists
        } else if lower.contains("read or write conflict")
            || lower.contains("transaction conflict")
            || lower.contains("can be retried")
        {
            Self::TransactionConflict
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("authentication")
            || lower.contains("signin")
            || lower.contains("credentials")
        {
            Self::AuthenticationFailed
        } else if lower.contains("connect") || lower.contains("unreachable") {
            Self::ConnectionFailed
        } else if lower.contains("deserializ") || lower.contains("serializ") {
            Self::SerializationError
        } else if lower.contains("parse") || lower.contains("syntax") {
            Self::QueryFailed
        } else {
            Self::Other
        }
    }
}

/// Structured store error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Message of the underlying error
    pub message: String,
}

impl StoreError {
    /// Create a new store error
    pub fn new(operation: StoreOperation, kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Classify a SurrealDB error raised during `operation`
    pub fn from_surreal(operation: StoreOperation, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        Self::new(operation, StoreErrorKind::classify(&message), message)
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::TransactionConflict
                | StoreErrorKind::ConnectionFailed
                | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    // The message alone is what reaches clients in `{errors: [...]}` bodies
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}
