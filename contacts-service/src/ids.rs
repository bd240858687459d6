//! Typed identifiers
//!
//! Two identifier types live here:
//!
//! - [`ContactId`]: the store key of a contact record. Path parameters must be
//!   parsed into a `ContactId` before they reach the store.
//! - [`RequestId`]: a TypeID (`req_<uuidv7>`) stamped on every HTTP request for
//!   log correlation.
//!
//! ```rust
//! use contacts_service::ids::{ContactId, RequestId};
//!
//! let contact_id: ContactId = "k3x9q0m2n8b7v6c5z4a1".parse().unwrap();
//! assert_eq!(contact_id.as_str(), "k3x9q0m2n8b7v6c5z4a1");
//!
//! let request_id = RequestId::new();
//! assert!(request_id.as_str().starts_with("req_"));
//! ```

use http::Request;
use mti::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Record keys generated by the store: 20 characters of `[0-9a-z]`
static CONTACT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z]{20}$").expect("contact id pattern is valid"));

/// Store identifier of a contact record.
///
/// The key is assigned by the store on creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Wraps a key produced by the store without validating it.
    pub(crate) fn from_store(key: String) -> Self {
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContactId {
    type Err = ContactIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if CONTACT_ID_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ContactIdError::Malformed(s.to_string()))
        }
    }
}

impl AsRef<str> for ContactId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Error type for contact ID parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactIdError {
    /// The input is not a store record key.
    #[error("Contact id '{0}' is malformed: expected 20 lowercase letters or digits")]
    Malformed(String),
}

/// A type-safe request identifier for log correlation.
///
/// Uses UUIDv7, so IDs sort by creation time.
///
/// Format: `req_<base32-encoded-uuidv7>`, e.g. `req_01h455vb4pex5vsknk084sn02q`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the prefix portion of the ID.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.prefix().as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `MakeRequestId` implementation that generates [`RequestId`]s for tower-http.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
