//! Contact data shapes
//!
//! [`ContactFields`] is everything a client may write; [`Contact`] is a stored
//! record: the fields plus what the store assigns (id and timestamps).

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ids::ContactId;

/// Client-writable contact fields.
///
/// Every field is optional and unvalidated. Absent fields are not stored and
/// are omitted from JSON output. An update replaces the whole set.
///
/// Numbers and booleans are accepted and stored as their text; objects and
/// arrays fail to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unique across all contacts
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Reference to a group; not checked against anything
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Read an optional text field, casting scalars to their string form
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "Cast to string failed for value {}",
            other
        ))),
    }
}

/// A persisted contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    #[serde(flatten)]
    pub fields: ContactFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_use_camel_case_wire_names() {
        let fields: ContactFields = serde_json::from_value(json!({
            "name": "Ada",
            "imageUrl": "https://example.com/ada.png",
            "groupId": "g1",
        }))
        .unwrap();

        assert_eq!(fields.image_url.as_deref(), Some("https://example.com/ada.png"));
        assert_eq!(fields.group_id.as_deref(), Some("g1"));
        assert!(fields.mobile.is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let fields = ContactFields {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&fields).unwrap(), json!({ "name": "Ada" }));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let fields: ContactFields = serde_json::from_value(json!({
            "mobile": "555-0100",
            "createdAt": "2020-01-01T00:00:00Z",
            "id": "whatever",
        }))
        .unwrap();
        assert_eq!(fields.mobile.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_scalars_are_stored_as_text() {
        let fields: ContactFields = serde_json::from_value(json!({
            "mobile": 5550100,
            "title": true,
            "company": null,
        }))
        .unwrap();

        assert_eq!(fields.mobile.as_deref(), Some("5550100"));
        assert_eq!(fields.title.as_deref(), Some("true"));
        assert!(fields.company.is_none());
    }

    #[test]
    fn test_structured_values_are_rejected() {
        let err = serde_json::from_value::<ContactFields>(json!({
            "name": { "first": "Ada" },
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Cast to string failed"));

        assert!(serde_json::from_value::<ContactFields>(json!({ "email": ["a@b.c"] })).is_err());
    }

    #[test]
    fn test_contact_serializes_flat() {
        let contact = Contact {
            id: "abcdefghij0123456789".parse().unwrap(),
            fields: ContactFields {
                mobile: Some("555-0100".to_string()),
                ..Default::default()
            },
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339("2024-05-02T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["id"], "abcdefghij0123456789");
        assert_eq!(value["mobile"], "555-0100");
        assert!(value.get("name").is_none());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
