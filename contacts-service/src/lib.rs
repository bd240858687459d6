//! # contacts-service
//!
//! REST API for managing contacts, backed by SurrealDB.
//!
//! ## Endpoints
//!
//! - `POST /contacts` - create a contact (mobile must be unused)
//! - `GET /contacts` - list contacts, newest first
//! - `GET /contacts/{contact_id}` - fetch one contact
//! - `PUT /contacts/{contact_id}` - replace a contact's fields
//! - `DELETE /contacts/{contact_id}` - remove a contact
//! - `GET /health`, `GET /ready` - liveness and readiness probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use contacts_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::connect(config.clone()).await?;
//!
//!     Server::new(config).serve(app(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod contact;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, MiddlewareConfig, ServiceConfig, SurrealDbConfig};
    pub use crate::contact::{Contact, ContactFields};
    pub use crate::error::{Error, Result};
    pub use crate::extract::ContactBody;
    pub use crate::handlers::{ApiError, ApiErrorKind, ApiOperation};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{ContactId, ContactIdError, MakeTypedRequestId, RequestId};
    pub use crate::middleware::{
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        SENSITIVE_HEADERS,
    };
    pub use crate::observability::init_tracing;
    pub use crate::responses::Created;
    pub use crate::routes::{app, contact_routes};
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::store::{
        ContactStore, StoreError, StoreErrorKind, StoreOperation, StoreResult,
        SurrealContactStore,
    };
}
