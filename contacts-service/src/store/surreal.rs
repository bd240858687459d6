//! SurrealDB-backed contact store
//!
//! Supports runtime protocol selection via URL scheme:
//! - `ws://` / `wss://` - WebSocket connections
//! - `http://` / `https://` - HTTP connections
//! - `mem://` - In-memory database (for testing)
//!
//! Contacts live in the `contact` table. The store assigns record keys and
//! both timestamps, and a `UNIQUE` index on `mobile` rejects duplicates even
//! when two inserts race past the handler's lookup.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::{StoreError, StoreErrorKind, StoreOperation};
use super::traits::{ContactStore, StoreResult};
use crate::config::SurrealDbConfig;
use crate::contact::{Contact, ContactFields};
use crate::ids::ContactId;

/// SurrealDB client type alias using the `Any` engine for runtime protocol selection
pub type SurrealClient = surrealdb::Surreal<surrealdb::engine::any::Any>;

const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS contact SCHEMALESS;
    DEFINE FIELD IF NOT EXISTS createdAt ON contact VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updatedAt ON contact VALUE time::now();
    DEFINE INDEX IF NOT EXISTS contact_mobile_unique ON contact FIELDS mobile UNIQUE;
"#;

/// Shape every query projects a contact record into
const PROJECTION: &str = "record::id(id) AS id, name, imageUrl, email, mobile, company, title, groupId, \
     <string> createdAt AS createdAt, <string> updatedAt AS updatedAt";

/// Contact store over a SurrealDB connection
#[derive(Clone)]
pub struct SurrealContactStore {
    client: SurrealClient,
}

impl SurrealContactStore {
    /// Connect with retries, then apply the contact schema
    pub async fn connect(config: &SurrealDbConfig) -> StoreResult<Self> {
        let client = create_client_with_retries(config, config.max_retries).await?;
        let store = Self { client };
        store.define_schema().await?;
        Ok(store)
    }

    async fn define_schema(&self) -> StoreResult<()> {
        self.client
            .query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| StoreError::from_surreal(StoreOperation::DefineSchema, e))?;

        tracing::debug!("Contact schema applied");
        Ok(())
    }
}

impl ContactStore for SurrealContactStore {
    async fn insert(&self, fields: ContactFields) -> StoreResult<Contact> {
        let op = StoreOperation::Insert;
        let query = format!("SELECT {PROJECTION} FROM (CREATE contact CONTENT $data)");

        let mut response = self
            .client
            .query(query)
            .bind(("data", fields))
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        let rows: Vec<ContactRow> = response.take(0).map_err(|e| StoreError::from_surreal(op, e))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| {
                StoreError::new(op, StoreErrorKind::Other, "Create returned no record")
            })?
            .into_contact(op)
    }

    async fn find_by_mobile(&self, mobile: Option<&str>) -> StoreResult<Option<Contact>> {
        let op = StoreOperation::FindByField;
        let query = format!("SELECT {PROJECTION} FROM contact WHERE mobile = $mobile LIMIT 1");

        let mut response = self
            .client
            .query(query)
            .bind(("mobile", mobile.map(str::to_owned)))
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        first_contact(&mut response, op)
    }

    async fn find_all_newest_first(&self) -> StoreResult<Vec<Contact>> {
        let op = StoreOperation::FindAll;
        // ORDER BY needs the raw datetime in its own selection, so sort in a subquery
        let query = format!(
            "SELECT {PROJECTION} FROM (SELECT * FROM contact ORDER BY createdAt DESC)"
        );

        let mut response = self
            .client
            .query(query)
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        let rows: Vec<ContactRow> = response.take(0).map_err(|e| StoreError::from_surreal(op, e))?;
        rows.into_iter().map(|row| row.into_contact(op)).collect()
    }

    async fn find_by_id(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        let op = StoreOperation::FindById;
        let query = format!("SELECT {PROJECTION} FROM type::thing('contact', $id)");

        let mut response = self
            .client
            .query(query)
            .bind(("id", id.as_str().to_owned()))
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        first_contact(&mut response, op)
    }

    async fn replace(&self, id: &ContactId, fields: ContactFields) -> StoreResult<Option<Contact>> {
        let op = StoreOperation::Replace;
        // UPDATE never creates, so a missing record yields an empty result
        let query = format!(
            "SELECT {PROJECTION} FROM (UPDATE type::thing('contact', $id) CONTENT $data)"
        );

        let mut response = self
            .client
            .query(query)
            .bind(("id", id.as_str().to_owned()))
            .bind(("data", fields))
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        first_contact(&mut response, op)
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<Option<Contact>> {
        let op = StoreOperation::Delete;
        let query = format!(
            "SELECT {PROJECTION} FROM (DELETE type::thing('contact', $id) RETURN BEFORE)"
        );

        let mut response = self
            .client
            .query(query)
            .bind(("id", id.as_str().to_owned()))
            .await
            .map_err(|e| StoreError::from_surreal(op, e))?;

        first_contact(&mut response, op)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.client
            .health()
            .await
            .map_err(|e| StoreError::from_surreal(StoreOperation::Ping, e))
    }
}

/// Contact as projected by [`PROJECTION`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactRow {
    id: String,
    name: Option<String>,
    image_url: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    company: Option<String>,
    title: Option<String>,
    group_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ContactRow {
    fn into_contact(self, op: StoreOperation) -> StoreResult<Contact> {
        Ok(Contact {
            id: ContactId::from_store(self.id),
            fields: ContactFields {
                name: self.name,
                image_url: self.image_url,
                email: self.email,
                mobile: self.mobile,
                company: self.company,
                title: self.title,
                group_id: self.group_id,
            },
            created_at: parse_timestamp(&self.created_at, op)?,
            updated_at: parse_timestamp(&self.updated_at, op)?,
        })
    }
}

fn parse_timestamp(raw: &str, op: StoreOperation) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StoreError::new(
                op,
                StoreErrorKind::SerializationError,
                format!("Invalid timestamp '{}': {}", raw, e),
            )
        })
}

fn first_contact(
    response: &mut surrealdb::Response,
    op: StoreOperation,
) -> StoreResult<Option<Contact>> {
    let rows: Vec<ContactRow> = response.take(0).map_err(|e| StoreError::from_surreal(op, e))?;
    rows.into_iter().next().map(|row| row.into_contact(op)).transpose()
}

/// Connect with exponential backoff between attempts
///
/// Only transient failures are retried; a bad scheme or rejected credentials
/// fail on the first attempt.
async fn create_client_with_retries(
    config: &SurrealDbConfig,
    max_retries: u32,
) -> StoreResult<SurrealClient> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_client(config).await {
            Ok(client) => {
                if attempt > 0 {
                    tracing::info!(
                        "SurrealDB connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        "SurrealDB connected: url={}, ns={}, db={}",
                        sanitize_url(&config.url),
                        config.namespace,
                        config.database
                    );
                }
                return Ok(client);
            }
            Err(e) => {
                if !e.is_retriable() {
                    tracing::error!("SurrealDB connection failed: {}", e);
                    return Err(e);
                }

                attempt += 1;

                if attempt > max_retries {
                    tracing::error!(
                        "Failed to connect to SurrealDB after {} attempts: {}",
                        max_retries + 1,
                        e
                    );
                    return Err(e);
                }

                let delay = base_delay * 2_u32.pow(attempt.saturating_sub(1));

                tracing::warn!(
                    "SurrealDB connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Single connection attempt: connect, sign in if configured, select ns/db
async fn try_create_client(config: &SurrealDbConfig) -> StoreResult<SurrealClient> {
    let op = StoreOperation::Connect;
    let url_safe = sanitize_url(&config.url);
    tracing::debug!("Connecting to SurrealDB: {}", url_safe);

    let client = surrealdb::engine::any::connect(&config.url)
        .await
        .map_err(|e| connect_error(op, &url_safe, e))?;

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client
            .signin(surrealdb::opt::auth::Root {
                username,
                password,
            })
            .await
            .map_err(|e| connect_error(op, &url_safe, e))?;
    }

    client
        .use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| connect_error(op, &url_safe, e))?;

    Ok(client)
}

fn connect_error(op: StoreOperation, url_safe: &str, err: surrealdb::Error) -> StoreError {
    let detail = err.to_string();
    let kind = StoreErrorKind::classify(&detail);
    StoreError::new(op, kind, format!("SurrealDB at '{}': {}", url_safe, detail))
}

/// Redact credentials embedded in a connection URL before logging it
pub fn sanitize_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_store;

    fn fields(name: &str, mobile: &str) -> ContactFields {
        ContactFields {
            name: Some(name.to_string()),
            mobile: Some(mobile.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sanitize_url_no_credentials() {
        assert_eq!(sanitize_url("ws://localhost:8000"), "ws://localhost:8000");
        assert_eq!(sanitize_url("mem://"), "mem://");
    }

    #[test]
    fn test_sanitize_url_with_credentials() {
        let sanitized = sanitize_url("ws://user:pass@localhost:8000");
        assert_eq!(sanitized, "ws://***@localhost:8000");
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let config = SurrealDbConfig {
            max_retries: 0,
            ..Default::default()
        };

        let result = SurrealContactStore::connect(&config).await;
        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_connect_unsupported_scheme_fails_without_retry() {
        // A retried attempt would sleep far past the timeout
        let config = SurrealDbConfig {
            url: "bogus://nowhere".to_string(),
            max_retries: 3,
            retry_delay_secs: 30,
            ..Default::default()
        };

        let err = tokio::time::timeout(Duration::from_secs(5), SurrealContactStore::connect(&config))
            .await
            .expect("unsupported scheme must not be retried")
            .err()
            .unwrap();
        assert_eq!(err.operation, StoreOperation::Connect);
        assert!(!err.is_retriable());
        assert!(err.message.contains("bogus://nowhere"));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = test_store().await;
        let input = ContactFields {
            name: Some("Ada".to_string()),
            image_url: Some("https://example.com/ada.png".to_string()),
            email: Some("ada@example.com".to_string()),
            mobile: Some("555-0100".to_string()),
            company: Some("Analytical Engines".to_string()),
            title: Some("Programmer".to_string()),
            group_id: Some("friends".to_string()),
        };

        let contact = store.insert(input.clone()).await.unwrap();
        assert_eq!(contact.fields, input);
        assert!(contact.id.as_str().parse::<ContactId>().is_ok());
        assert!(contact.updated_at >= contact.created_at);
    }

    #[tokio::test]
    async fn test_insert_without_optional_fields() {
        let store = test_store().await;
        let contact = store.insert(ContactFields::default()).await.unwrap();
        assert_eq!(contact.fields, ContactFields::default());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_mobile() {
        let store = test_store().await;
        store.insert(fields("A", "555-0100")).await.unwrap();

        let err = store.insert(fields("B", "555-0100")).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::AlreadyExists);
        assert_eq!(err.operation, StoreOperation::Insert);
    }

    #[tokio::test]
    async fn test_find_by_mobile() {
        let store = test_store().await;
        let created = store.insert(fields("A", "555-0100")).await.unwrap();

        let found = store.find_by_mobile(Some("555-0100")).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(store.find_by_mobile(Some("555-0199")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let store = test_store().await;
        let mut created = Vec::new();
        for i in 0..4 {
            created.push(store.insert(fields(&format!("C{i}"), &format!("555-01{i:02}"))).await.unwrap());
        }

        let listed = store.find_all_newest_first().await.unwrap();
        created.reverse();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = test_store().await;
        let created = store.insert(fields("A", "555-0100")).await.unwrap();

        assert_eq!(store.find_by_id(&created.id).await.unwrap(), Some(created));

        let unknown: ContactId = "zzzzzzzzzzzzzzzzzzzz".parse().unwrap();
        assert!(store.find_by_id(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_overwrites_all_fields() {
        let store = test_store().await;
        let mut original = fields("A", "555-0100");
        original.company = Some("Acme".to_string());
        let created = store.insert(original).await.unwrap();

        let replaced = store
            .replace(&created.id, fields("B", "555-0101"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.fields, fields("B", "555-0101"));
        assert!(replaced.fields.company.is_none());
        assert_eq!(replaced.created_at, created.created_at);
        assert!(replaced.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_replace_missing_record_creates_nothing() {
        let store = test_store().await;
        let unknown: ContactId = "zzzzzzzzzzzzzzzzzzzz".parse().unwrap();

        let replaced = store.replace(&unknown, fields("A", "555-0100")).await.unwrap();
        assert!(replaced.is_none());
        assert!(store.find_all_newest_first().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let store = test_store().await;
        let created = store.insert(fields("A", "555-0100")).await.unwrap();

        let deleted = store.delete(&created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
        assert!(store.delete(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let store = test_store().await;
        assert!(store.ping().await.is_ok());
    }
}
