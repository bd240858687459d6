//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    store::{ContactStore, SurrealContactStore},
};

/// Application state shared across handlers
///
/// Generic over the store so handlers can be exercised against any
/// [`ContactStore`]. Cloned per request; both members are cheap to clone.
#[derive(Clone)]
pub struct AppState<S = SurrealContactStore>
where
    S: ContactStore,
{
    config: Arc<Config>,
    store: S,
}

impl<S> AppState<S>
where
    S: ContactStore,
{
    /// Create a new AppState from a configuration and an opened store
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the contact store
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl AppState<SurrealContactStore> {
    /// Open the SurrealDB store described by `config` and wrap it in state
    pub async fn connect(config: Config) -> Result<Self> {
        let store = SurrealContactStore::connect(&config.surrealdb).await?;
        Ok(Self::new(config, store))
    }
}
