//! API error types for contact handlers
//!
//! Every handler failure becomes an [`ApiError`], which renders one of two body
//! shapes: `{"msg": ...}` for expected domain failures (conflict, not found)
//! and `{"errors": [...]}` for everything else.
//!
//! # Example
//!
//! ```rust
//! use contacts_service::handlers::{ApiError, ApiErrorKind, ApiOperation};
//!
//! let error = ApiError::not_found(ApiOperation::Get, "The Contact is not found!");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.kind.status_code().as_u16(), 404);
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ids::ContactIdError;
use crate::store::{StoreError, StoreOperation};

/// Message returned when a create collides with an existing mobile
pub const MOBILE_EXISTS_MSG: &str = "Contact is exist with the mobile number";
/// Message returned when get or delete names an unknown contact
pub const NOT_FOUND_MSG: &str = "The Contact is not found!";
/// Message returned when update names an unknown contact
pub const NOT_FOUND_TO_UPDATE_MSG: &str = "Contact is not found to update";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing contacts
    List,
    /// Getting a single contact by id
    Get,
    /// Creating a new contact
    Create,
    /// Replacing a contact's fields
    Update,
    /// Deleting a contact
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// A contact with the same mobile already exists
    Conflict,
    /// The referenced contact does not exist
    NotFound,
    /// The request body is not well-formed JSON
    BadRequest,
    /// Anything else, including malformed ids and store failures
    Unexpected,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not_found"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl ApiErrorKind {
    /// Get the HTTP status code for this error kind
    ///
    /// Conflict is reported as 401, which existing clients depend on.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether failures of this kind render as `{"msg": ...}`
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Conflict | Self::NotFound)
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Message sent to the client
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create the conflict error for a duplicate mobile
    pub fn mobile_exists() -> Self {
        Self::new(ApiOperation::Create, ApiErrorKind::Conflict, MOBILE_EXISTS_MSG)
    }

    /// Create a "not found" error with the given client message
    pub fn not_found(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::NotFound, message)
    }

    /// Create an unexpected error
    pub fn unexpected(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Unexpected, message)
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for ApiError {}

/// Body for expected domain failures
#[derive(Debug, Serialize, Deserialize)]
struct MsgBody {
    msg: String,
}

/// Body for unexpected failures
#[derive(Debug, Serialize, Deserialize)]
struct ErrorsBody {
    errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if self.kind.is_domain() {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                "API error: {}", self.message
            );
            return (status, Json(MsgBody { msg: self.message })).into_response();
        }

        tracing::error!(
            operation = %self.operation,
            kind = %self.kind,
            "API error: {}", self.message
        );

        let body = ErrorsBody {
            errors: vec![self.message],
        };
        (status, Json(body)).into_response()
    }
}

fn store_operation_to_api_operation(op: StoreOperation) -> ApiOperation {
    match op {
        StoreOperation::Insert | StoreOperation::FindByField => ApiOperation::Create,
        StoreOperation::FindById => ApiOperation::Get,
        StoreOperation::Replace => ApiOperation::Update,
        StoreOperation::Delete => ApiOperation::Delete,
        StoreOperation::FindAll
        | StoreOperation::Connect
        | StoreOperation::DefineSchema
        | StoreOperation::Ping => ApiOperation::List,
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Duplicate mobiles on create are resolved before reaching here, so a
        // replace that hits the mobile index is unexpected like any other failure
        Self::unexpected(store_operation_to_api_operation(err.operation), err.message)
    }
}

impl From<ContactIdError> for ApiError {
    fn from(err: ContactIdError) -> Self {
        Self::unexpected(ApiOperation::Get, err.to_string())
    }
}
