//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{state::AppState, store::ContactStore};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health<S: ContactStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check against the contact store (readiness probe)
///
/// Returns 200 OK when the store answers a ping, 503 Service Unavailable otherwise.
pub async fn readiness<S: ContactStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let store_status = match state.store().ping().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some("Connected".to_string()),
        },
        Err(e) => {
            tracing::error!("SurrealDB health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(format!("Health check failed: {}", e)),
            }
        }
    };
    let all_ready = store_status.healthy;
    dependencies.insert("surrealdb".to_string(), store_status);

    let response = ReadinessResponse {
        ready: all_ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if all_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::contact::{Contact, ContactFields};
    use crate::ids::ContactId;
    use crate::store::{StoreError, StoreErrorKind, StoreOperation, StoreResult};

    /// Store whose every call fails, for the unhealthy path
    #[derive(Clone)]
    struct DownStore;

    fn down(operation: StoreOperation) -> StoreError {
        StoreError::new(operation, StoreErrorKind::ConnectionFailed, "connection refused")
    }

    impl ContactStore for DownStore {
        async fn insert(&self, _fields: ContactFields) -> StoreResult<Contact> {
            Err(down(StoreOperation::Insert))
        }

        async fn find_by_mobile(&self, _mobile: Option<&str>) -> StoreResult<Option<Contact>> {
            Err(down(StoreOperation::FindByField))
        }

        async fn find_all_newest_first(&self) -> StoreResult<Vec<Contact>> {
            Err(down(StoreOperation::FindAll))
        }

        async fn find_by_id(&self, _id: &ContactId) -> StoreResult<Option<Contact>> {
            Err(down(StoreOperation::FindById))
        }

        async fn replace(
            &self,
            _id: &ContactId,
            _fields: ContactFields,
        ) -> StoreResult<Option<Contact>> {
            Err(down(StoreOperation::Replace))
        }

        async fn delete(&self, _id: &ContactId) -> StoreResult<Option<Contact>> {
            Err(down(StoreOperation::Delete))
        }

        async fn ping(&self) -> StoreResult<()> {
            Err(down(StoreOperation::Ping))
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_name_and_version() {
        let state = AppState::new(Config::default(), DownStore);
        let response = health(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "contacts-service");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_readiness_with_live_store() {
        let state = AppState::new(Config::default(), crate::store::test_store().await);
        let response = readiness(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["dependencies"]["surrealdb"]["healthy"], true);
    }

    #[tokio::test]
    async fn test_readiness_with_unreachable_store() {
        let state = AppState::new(Config::default(), DownStore);
        let response = readiness(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["ready"], false);
        assert_eq!(body["dependencies"]["surrealdb"]["healthy"], false);
        assert!(body["dependencies"]["surrealdb"]["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }
}
