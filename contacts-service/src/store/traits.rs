//! Contact store trait
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can be
//! written with plain `async fn`.

use std::future::Future;

use super::error::StoreError;
use crate::contact::{Contact, ContactFields};
use crate::ids::ContactId;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence operations the contact handlers rely on.
///
/// Implementations assign `id`, `createdAt` and `updatedAt` themselves and must
/// reject a second contact carrying an existing `mobile` with
/// [`StoreErrorKind::AlreadyExists`](super::StoreErrorKind::AlreadyExists).
///
/// The handle is cloned into every request, so cloning must be cheap.
pub trait ContactStore: Clone + Send + Sync + 'static {
    /// Persist a new contact and return it as stored
    fn insert(&self, fields: ContactFields) -> impl Future<Output = StoreResult<Contact>> + Send;

    /// Find any contact whose `mobile` equals the given value.
    ///
    /// `None` matches contacts that have no mobile.
    fn find_by_mobile(
        &self,
        mobile: Option<&str>,
    ) -> impl Future<Output = StoreResult<Option<Contact>>> + Send;

    /// All contacts, most recently created first
    fn find_all_newest_first(&self) -> impl Future<Output = StoreResult<Vec<Contact>>> + Send;

    /// Find a contact by id
    fn find_by_id(
        &self,
        id: &ContactId,
    ) -> impl Future<Output = StoreResult<Option<Contact>>> + Send;

    /// Overwrite every client field of a contact.
    ///
    /// Returns the record after the write, or `None` if no contact has `id`.
    fn replace(
        &self,
        id: &ContactId,
        fields: ContactFields,
    ) -> impl Future<Output = StoreResult<Option<Contact>>> + Send;

    /// Delete a contact, returning what was removed (`None` if nothing was)
    fn delete(&self, id: &ContactId) -> impl Future<Output = StoreResult<Option<Contact>>> + Send;

    /// Check the store is reachable
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
