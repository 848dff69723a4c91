//! REST client for the hosted document/auth/storage backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use ambra_core::{Email, UserId};

use crate::config::BackendConfig;
use crate::ports::auth::{AuthBackend, AuthBackendError, AuthUser};
use crate::ports::documents::{Direction, DocumentError, Documents, Predicate, Query};
use crate::ports::storage::{ObjectStorage, StorageError};

/// Documents stay in the read cache this long.
const DOCUMENT_CACHE_TTL: Duration = Duration::from_secs(300);
const DOCUMENT_CACHE_CAPACITY: u64 = 1000;

/// Client for the hosted backend's REST API.
///
/// Implements the document, auth and object-storage ports. Document reads
/// are cached for 5 minutes; writes invalidate their entry.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    storage_public_url: String,
    cache: Cache<String, Value>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(DOCUMENT_CACHE_CAPACITY)
            .time_to_live(DOCUMENT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
                storage_public_url: config.storage_public_url.clone(),
                cache,
            }),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{collection}/{id}", self.inner.base_url)
    }

    fn auth_url(&self, action: &str) -> String {
        format!("{}/v1/auth/{action}", self.inner.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-Api-Key", &self.inner.api_key)
    }

    /// Invalidate all cached document reads.
    pub async fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Serialize a query into the backend's wire shape.
fn query_body(query: &Query) -> Value {
    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|(field, predicate)| match predicate {
            Predicate::Eq(value) => json!({ "field": field, "op": "eq", "value": value }),
            Predicate::Gte(value) => json!({ "field": field, "op": "gte", "value": value }),
            Predicate::Lte(value) => json!({ "field": field, "op": "lte", "value": value }),
        })
        .collect();

    json!({
        "filters": filters,
        "order_by": query.order_by.as_ref().map(|(field, direction)| json!({
            "field": field,
            "direction": match direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            },
        })),
        "limit": query.limit,
    })
}

#[async_trait]
impl Documents for BackendClient {
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn get(&self, collection: &str, id: &str) -> Result<Value, DocumentError> {
        let cache_key = format!("doc:{collection}/{id}");

        if let Some(document) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for document");
            return Ok(document);
        }

        let response = self
            .authorize(self.inner.client.get(self.document_url(collection, id)))
            .send()
            .await
            .map_err(|err| DocumentError::Unavailable(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(DocumentError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            }),
            status if status.is_success() => {
                let document: Value = response
                    .json()
                    .await
                    .map_err(|err| DocumentError::Malformed {
                        id: id.to_owned(),
                        reason: err.to_string(),
                    })?;
                self.inner.cache.insert(cache_key, document.clone()).await;
                Ok(document)
            }
            status => Err(DocumentError::Unavailable(format!("HTTP {status}"))),
        }
    }

    #[instrument(skip(self, value), fields(collection = %collection, id = %id))]
    async fn put(&self, collection: &str, id: &str, value: Value) -> Result<(), DocumentError> {
        let response = self
            .authorize(self.inner.client.put(self.document_url(collection, id)))
            .json(&value)
            .send()
            .await
            .map_err(|err| DocumentError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Unavailable(format!("HTTP {status}")));
        }

        self.inner
            .cache
            .invalidate(&format!("doc:{collection}/{id}"))
            .await;
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        let response = self
            .authorize(self.inner.client.delete(self.document_url(collection, id)))
            .send()
            .await
            .map_err(|err| DocumentError::Unavailable(err.to_string()))?;

        let status = response.status();
        // Deleting a missing document is not an error.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(DocumentError::Unavailable(format!("HTTP {status}")));
        }

        self.inner
            .cache
            .invalidate(&format!("doc:{collection}/{id}"))
            .await;
        Ok(())
    }

    #[instrument(skip(self, query), fields(collection = %collection))]
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Value>, DocumentError> {
        let url = format!("{}/v1/{collection}/query", self.inner.base_url);
        let response = self
            .authorize(self.inner.client.post(url))
            .json(&query_body(&query))
            .send()
            .await
            .map_err(|err| DocumentError::Unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentError::Unavailable(format!("HTTP {status}")));
        }

        response.json().await.map_err(|err| DocumentError::Malformed {
            id: format!("{collection} query"),
            reason: err.to_string(),
        })
    }
}

/// Wire shape of an auth principal.
#[derive(serde::Deserialize)]
struct AuthUserPayload {
    uid: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl AuthUserPayload {
    fn into_auth_user(self) -> Result<AuthUser, AuthBackendError> {
        let email = Email::parse(&self.email)
            .map_err(|err| AuthBackendError::Unavailable(format!("bad principal email: {err}")))?;
        Ok(AuthUser {
            uid: UserId::new(self.uid),
            email,
            display_name: self.display_name,
        })
    }
}

#[async_trait]
impl AuthBackend for BackendClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, AuthBackendError> {
        let response = self
            .authorize(self.inner.client.post(self.auth_url("sign-in")))
            .json(&json!({ "email": email.as_str(), "password": password }))
            .send()
            .await
            .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                Err(AuthBackendError::InvalidCredentials)
            }
            StatusCode::FORBIDDEN => Err(AuthBackendError::Disabled),
            status if status.is_success() => {
                let payload: AuthUserPayload = response
                    .json()
                    .await
                    .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;
                payload.into_auth_user()
            }
            status => Err(AuthBackendError::Unavailable(format!("HTTP {status}"))),
        }
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn sign_out(&self, uid: &UserId) -> Result<(), AuthBackendError> {
        let response = self
            .authorize(self.inner.client.post(self.auth_url("sign-out")))
            .json(&json!({ "uid": uid.as_str() }))
            .send()
            .await
            .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthBackendError::Unavailable(format!("HTTP {status}")))
        }
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<AuthUser>, AuthBackendError> {
        let response = self
            .authorize(self.inner.client.get(self.auth_url("me")))
            .send()
            .await
            .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => Ok(None),
            status if status.is_success() => {
                let payload: AuthUserPayload = response
                    .json()
                    .await
                    .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;
                payload.into_auth_user().map(Some)
            }
            status => Err(AuthBackendError::Unavailable(format!("HTTP {status}"))),
        }
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthBackendError> {
        let response = self
            .authorize(self.inner.client.post(self.auth_url("password-reset")))
            .json(&json!({ "email": email.as_str() }))
            .send()
            .await
            .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthBackendError::Unavailable(format!("HTTP {status}")))
        }
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn update_display_name(
        &self,
        uid: &UserId,
        name: &str,
    ) -> Result<(), AuthBackendError> {
        let response = self
            .authorize(self.inner.client.patch(self.auth_url("profile")))
            .json(&json!({ "uid": uid.as_str(), "display_name": name }))
            .send()
            .await
            .map_err(|err| AuthBackendError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthBackendError::Unavailable(format!("HTTP {status}")))
        }
    }
}

#[async_trait]
impl ObjectStorage for BackendClient {
    #[instrument(skip(self, bytes), fields(path = %path, size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/v1/storage/{path}", self.inner.base_url);
        let response = self
            .authorize(self.inner.client.put(url))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StorageError::Unavailable(format!("HTTP {status}")))
        }
    }

    async fn download_url(&self, path: &str) -> Result<String, StorageError> {
        Ok(format!("{}/{path}", self.inner.storage_public_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_wire_shape() {
        let query = Query::all()
            .where_eq("slug", "amber-oud")
            .order("created_at", Direction::Desc)
            .take(1);
        let body = query_body(&query);

        assert_eq!(body["filters"][0]["op"], "eq");
        assert_eq!(body["filters"][0]["value"], "amber-oud");
        assert_eq!(body["order_by"]["direction"], "desc");
        assert_eq!(body["limit"], 1);
    }

    #[test]
    fn test_query_body_omits_unset_clauses() {
        let body = query_body(&Query::all());
        assert!(body["filters"].as_array().is_some_and(Vec::is_empty));
        assert!(body["order_by"].is_null());
        assert!(body["limit"].is_null());
    }
}
