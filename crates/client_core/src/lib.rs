use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{LaptopId, LaptopRecord},
    draft::LaptopDraft,
    error::ValidationError,
};
use tracing::info;
use url::Url;

pub mod error;
pub mod observer;
mod transport;

pub use error::{ClientError, ErrorKind, FetchTarget, Result, SetupError};
pub use observer::{NoopObserver, RequestObserver, TracingObserver};

use transport::{exchange, TransportFailure};

const COLLECTION: &str = "laptops";

/// Operations against the remote laptops collection.
///
/// Every failure is reported as a [`ClientError`] whose message is ready to
/// be shown to the user.
#[async_trait]
pub trait LaptopService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<LaptopRecord>>;
    async fn get_by_id(&self, id: &LaptopId) -> Result<LaptopRecord>;
    /// Normalizes the draft before sending it.
    async fn create(&self, draft: &LaptopDraft) -> Result<LaptopRecord>;
    /// Sends `record` as-is; no coercion is re-applied.
    async fn update(&self, id: &LaptopId, record: &LaptopRecord) -> Result<LaptopRecord>;
    async fn remove(&self, id: &LaptopId) -> Result<Value>;
}

pub struct LaptopClient {
    http: Client,
    base_url: Url,
    observer: Arc<dyn RequestObserver>,
}

impl LaptopClient {
    pub fn new(base_url: &str) -> std::result::Result<Self, SetupError> {
        Self::new_with_observer(base_url, Arc::new(TracingObserver))
    }

    pub fn new_with_observer(
        base_url: &str,
        observer: Arc<dyn RequestObserver>,
    ) -> std::result::Result<Self, SetupError> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url,
            observer,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Url {
        self.url_for(None)
    }

    fn item_url(&self, id: &LaptopId) -> Url {
        self.url_for(Some(id))
    }

    fn url_for(&self, id: Option<&LaptopId>) -> Url {
        let mut url = self.base_url.clone();
        // `parse_base_url` rejects cannot-be-a-base urls, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<&Value>,
    ) -> std::result::Result<String, TransportFailure> {
        exchange(&self.http, self.observer.as_ref(), method, url, payload).await
    }
}

/// Validates a base address: http(s) only, trailing slash dropped.
pub fn parse_base_url(raw: &str) -> std::result::Result<Url, SetupError> {
    let invalid = |reason: String| SetupError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot carry a path".into()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".into()));
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    url.set_path(&trimmed);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &str) -> std::result::Result<T, String> {
    serde_json::from_str(body).map_err(|err| format!("invalid response body: {err}"))
}

fn is_blank(body: &str) -> bool {
    let body = body.trim();
    body.is_empty() || body == "null"
}

fn to_payload(record: &LaptopRecord) -> Value {
    // Serializing a record only touches strings, numbers and JSON values.
    serde_json::to_value(record.without_id()).unwrap_or(Value::Null)
}

fn check_required(record: &LaptopRecord) -> std::result::Result<(), ValidationError> {
    if record.brand.trim().is_empty() || record.model.trim().is_empty() {
        return Err(ValidationError::MissingRequired);
    }
    Ok(())
}

#[async_trait]
impl LaptopService for LaptopClient {
    async fn list_all(&self) -> Result<Vec<LaptopRecord>> {
        let fetch_failed = |detail: String| ClientError::FetchFailed {
            target: FetchTarget::Collection,
            detail,
        };

        let body = self
            .send(Method::GET, self.collection_url(), None)
            .await
            .map_err(|failure| fetch_failed(failure.detail()))?;

        match serde_json::from_str::<Value>(&body) {
            Ok(items @ Value::Array(_)) => {
                serde_json::from_value(items).map_err(|err| {
                    fetch_failed(format!("invalid response body: {err}"))
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn get_by_id(&self, id: &LaptopId) -> Result<LaptopRecord> {
        let body = self
            .send(Method::GET, self.item_url(id), None)
            .await
            .map_err(|failure| {
                if failure.is_not_found() {
                    ClientError::NotFound {
                        id: id.clone(),
                        detail: failure.detail(),
                    }
                } else {
                    ClientError::FetchFailed {
                        target: FetchTarget::Item,
                        detail: failure.detail(),
                    }
                }
            })?;

        if is_blank(&body) {
            return Err(ClientError::NotFound {
                id: id.clone(),
                detail: format!("Laptop {id} not found"),
            });
        }

        decode(&body).map_err(|detail| ClientError::FetchFailed {
            target: FetchTarget::Item,
            detail,
        })
    }

    async fn create(&self, draft: &LaptopDraft) -> Result<LaptopRecord> {
        draft.validate()?;
        let record = draft.to_record();
        let payload = to_payload(&record);

        let body = self
            .send(Method::POST, self.collection_url(), Some(&payload))
            .await
            .map_err(|failure| ClientError::CreateFailed {
                detail: failure.create_detail(),
            })?;

        let created: LaptopRecord = if is_blank(&body) {
            record
        } else {
            decode(&body).map_err(|detail| ClientError::CreateFailed { detail })?
        };
        info!(
            id = %created.display_id().map(|id| id.to_string()).unwrap_or_default(),
            brand = %created.brand,
            model = %created.model,
            "laptop created"
        );
        Ok(created)
    }

    async fn update(&self, id: &LaptopId, record: &LaptopRecord) -> Result<LaptopRecord> {
        check_required(record)?;
        let payload = to_payload(record);

        let body = self
            .send(Method::PUT, self.item_url(id), Some(&payload))
            .await
            .map_err(|failure| ClientError::UpdateFailed {
                detail: failure.detail(),
            })?;

        let updated = if is_blank(&body) {
            LaptopRecord {
                id: Some(id.clone()),
                ..record.clone()
            }
        } else {
            decode(&body).map_err(|detail| ClientError::UpdateFailed { detail })?
        };
        info!(id = %id, "laptop updated");
        Ok(updated)
    }

    async fn remove(&self, id: &LaptopId) -> Result<Value> {
        let body = self
            .send(Method::DELETE, self.item_url(id), None)
            .await
            .map_err(|failure| ClientError::DeleteFailed {
                detail: failure.detail(),
            })?;

        info!(id = %id, "laptop deleted");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(body)),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
