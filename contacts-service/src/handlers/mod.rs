//! HTTP handlers for the contact resource
//!
//! - [`contacts`]: create, list, get, update and delete
//! - [`ApiError`]: maps failures to status codes and the `{msg}` / `{errors}`
//!   body shapes

pub mod contacts;
mod error;

pub use contacts::{create_contact, delete_contact, get_contact, list_contacts, update_contact};
pub use error::{
    ApiError, ApiErrorKind, ApiOperation, MOBILE_EXISTS_MSG, NOT_FOUND_MSG,
    NOT_FOUND_TO_UPDATE_MSG,
};
