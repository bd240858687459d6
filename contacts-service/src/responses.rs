//! HTTP response builders
//!
//! - **201 Created** - Contact created (POST), with a `Location` header
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use contacts_service::responses::Created;
//!
//! async fn create_contact() -> Created<Contact> {
//!     let contact = store.insert(fields).await?;
//!     let location = format!("/contacts/{}", contact.id);
//!     Created::new(contact).with_location(location)
//! }
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// HTTP 201 Created response
///
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_created_with_location() {
        let response = Created::new(json!({ "id": "abc" }))
            .with_location("/contacts/abc")
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/contacts/abc"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "id": "abc" }));
    }

    #[test]
    fn test_created_without_location() {
        let response = Created::new(json!({})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_invalid_location_is_skipped() {
        let response = Created::new(json!({}))
            .with_location("/contacts/\n")
            .into_response();
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
