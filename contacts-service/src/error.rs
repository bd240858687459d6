//! Service-level error type
//!
//! Request handlers report failures through [`ApiError`](crate::handlers::ApiError);
//! this type covers startup and runtime failures outside a request: loading
//! configuration, opening the store, binding the listener.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Invalid configuration value that parsed correctly
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Structured store error with operation context
    #[error("{0}")]
    Store(StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreErrorKind, StoreOperation};

    #[test]
    fn test_config_error_display() {
        let err: Error = figment::Error::from("missing field `port`".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error:"));
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_store_error_passes_through_display() {
        let store_err = StoreError::new(
            StoreOperation::Connect,
            StoreErrorKind::ConnectionFailed,
            "connection refused",
        );
        let err: Error = store_err.clone().into();
        assert_eq!(err.to_string(), store_err.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("address in use"));
    }
}
