//! Request body extraction for contact writes
//!
//! [`ContactBody`] reads the body the way the API has always accepted it:
//!
//! - no JSON content type, or an empty body, reads as no fields at all
//! - a JSON object supplies the fields (scalars are cast to text)
//! - a JSON array carries no named fields and reads as no fields
//! - malformed JSON or a bare scalar is a 400 `{errors}`
//! - a field holding an object or array is a 500 `{errors}`

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::contact::ContactFields;
use crate::handlers::{ApiError, ApiErrorKind, ApiOperation};

/// Contact fields taken from a create or update body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactBody(pub ContactFields);

impl ContactBody {
    /// Parse a raw body. `is_json` reflects the request's content type.
    pub fn parse(bytes: &[u8], is_json: bool) -> Result<Self, ApiError> {
        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            ApiError::new(
                ApiOperation::Create,
                ApiErrorKind::BadRequest,
                format!("Malformed JSON body: {}", e),
            )
        })?;

        match value {
            Value::Object(_) => serde_json::from_value(value)
                .map(Self)
                .map_err(|e| ApiError::unexpected(ApiOperation::Create, e.to_string())),
            Value::Array(_) => Ok(Self::default()),
            other => Err(ApiError::new(
                ApiOperation::Create,
                ApiErrorKind::BadRequest,
                format!("Expected a JSON object or array, found {}", other),
            )),
        }
    }
}

fn has_json_content_type(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

impl<S> FromRequest<S> for ContactBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(&req);

        // Body limit rejections keep their own status
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Self::parse(&bytes, is_json).map_err(IntoResponse::into_response)
    }
}
