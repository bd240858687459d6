//! Contact persistence
//!
//! Handlers depend on the [`ContactStore`] trait and receive a concrete store
//! through application state. [`SurrealContactStore`] is the production
//! implementation.

mod error;
mod surreal;
mod traits;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use surreal::{sanitize_url, SurrealClient, SurrealContactStore};
pub use traits::{ContactStore, StoreResult};

/// Fresh in-memory store with the schema applied
#[cfg(test)]
pub(crate) async fn test_store() -> SurrealContactStore {
    let config = crate::config::SurrealDbConfig {
        max_retries: 0,
        ..Default::default()
    };
    SurrealContactStore::connect(&config)
        .await
        .expect("in-memory SurrealDB should start")
}
