//! Router assembly
//!
//! Contact routes live under `/contacts`. Health and readiness endpoints are
//! always mounted alongside them.

use axum::{routing::get, Router};

use crate::{
    handlers::{create_contact, delete_contact, get_contact, list_contacts, update_contact},
    health::{health, readiness},
    state::AppState,
    store::ContactStore,
};

/// Contact resource routes, still waiting for state
pub fn contact_routes<S: ContactStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(list_contacts::<S>).post(create_contact::<S>))
        .route(
            "/{contact_id}",
            get(get_contact::<S>)
                .put(update_contact::<S>)
                .delete(delete_contact::<S>),
        )
}

/// Full application router with state attached
pub fn app<S: ContactStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
        .nest("/contacts", contact_routes::<S>())
        .with_state(state)
}
