//! Contact resource handlers
//!
//! Each handler is generic over the [`ContactStore`] held in [`AppState`], so
//! the same code serves the SurrealDB store in production and in tests.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use super::error::{ApiError, ApiOperation, NOT_FOUND_MSG, NOT_FOUND_TO_UPDATE_MSG};
use crate::contact::{Contact, ContactFields};
use crate::extract::ContactBody;
use crate::ids::ContactId;
use crate::responses::Created;
use crate::state::AppState;
use crate::store::{ContactStore, StoreErrorKind, StoreResult};

/// Attempts at the lookup-then-insert sequence when a concurrent write wins
const CREATE_ATTEMPTS: u32 = 5;

/// Parse a path segment into a [`ContactId`]
///
/// A malformed id is an unexpected failure, not a 404.
fn parse_id(raw: &str, operation: ApiOperation) -> Result<ContactId, ApiError> {
    raw.parse::<ContactId>()
        .map_err(|e| ApiError::from(e).with_operation(operation))
}

/// One lookup-then-insert pass. `None` means the mobile is taken, whether the
/// lookup saw it or the unique index rejected the insert.
async fn try_insert_unique<S: ContactStore>(
    store: &S,
    fields: ContactFields,
) -> StoreResult<Option<Contact>> {
    if store
        .find_by_mobile(fields.mobile.as_deref())
        .await?
        .is_some()
    {
        return Ok(None);
    }

    match store.insert(fields).await {
        Ok(contact) => Ok(Some(contact)),
        Err(e) if e.kind == StoreErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(e),
    }
}

/// Insert `fields` unless some contact already holds its mobile.
///
/// A transaction conflict means another writer committed first, so the whole
/// pass runs again and normally ends at the lookup.
async fn insert_unique<S: ContactStore>(
    store: &S,
    fields: ContactFields,
) -> StoreResult<Option<Contact>> {
    let mut attempt = 1;

    loop {
        match try_insert_unique(store, fields.clone()).await {
            Err(e) if e.kind == StoreErrorKind::TransactionConflict && attempt < CREATE_ATTEMPTS => {
                tracing::debug!(attempt, "Create lost a write conflict, retrying: {}", e);
                tokio::time::sleep(Duration::from_millis(5 * u64::from(attempt))).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// `POST /contacts`
///
/// Rejects the request with a conflict if any contact already has the
/// submitted mobile. Absent mobiles compare equal to each other.
pub async fn create_contact<S: ContactStore>(
    State(state): State<AppState<S>>,
    ContactBody(fields): ContactBody,
) -> Result<Created<Contact>, ApiError> {
    let contact = insert_unique(state.store(), fields)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?
        .ok_or_else(ApiError::mobile_exists)?;

    tracing::info!(contact_id = %contact.id, "Contact created");

    let location = format!("/contacts/{}", contact.id);
    Ok(Created::new(contact).with_location(location))
}

/// `GET /contacts`, newest first
pub async fn list_contacts<S: ContactStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state
        .store()
        .find_all_newest_first()
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;

    tracing::debug!(count = contacts.len(), "Listed contacts");
    Ok(Json(contacts))
}

/// `GET /contacts/{contact_id}`
pub async fn get_contact<S: ContactStore>(
    State(state): State<AppState<S>>,
    Path(contact_id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&contact_id, ApiOperation::Get)?;

    state
        .store()
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(ApiOperation::Get, NOT_FOUND_MSG))
}

/// `PUT /contacts/{contact_id}`
///
/// Replaces every client field; omitted fields are cleared. The mobile is not
/// checked against other contacts here.
pub async fn update_contact<S: ContactStore>(
    State(state): State<AppState<S>>,
    Path(contact_id): Path<String>,
    ContactBody(fields): ContactBody,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&contact_id, ApiOperation::Update)?;
    let store = state.store();

    let not_found = || ApiError::not_found(ApiOperation::Update, NOT_FOUND_TO_UPDATE_MSG);

    if store.find_by_id(&id).await?.is_none() {
        return Err(not_found());
    }

    let contact = store.replace(&id, fields).await?.ok_or_else(not_found)?;
    tracing::info!(contact_id = %contact.id, "Contact updated");

    Ok(Json(contact))
}

/// `DELETE /contacts/{contact_id}`, answering `{}`
pub async fn delete_contact<S: ContactStore>(
    State(state): State<AppState<S>>,
    Path(contact_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&contact_id, ApiOperation::Delete)?;
    let store = state.store();

    let not_found = || ApiError::not_found(ApiOperation::Delete, NOT_FOUND_MSG);

    if store.find_by_id(&id).await?.is_none() {
        return Err(not_found());
    }

    store.delete(&id).await?.ok_or_else(not_found)?;
    tracing::info!(contact_id = %id, "Contact deleted");

    Ok(Json(json!({})))
}
