use anyhow::bail;
use axum::http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::server::{Dispatch, MockBackend, MockRequest, MockResponse};
use crate::store::Collection;

const DEFAULT_BASE_PATH: &str = "/api";

/// Typed client for the mock REST surface.
///
/// Responses are decoded into the model types here, which is also where
/// serialized dates turn back into `chrono` values.
#[derive(Clone)]
pub struct ApiClient {
    backend: MockBackend,
    base_path: String,
}

impl ApiClient {
    pub fn new(backend: MockBackend) -> Self {
        Self::with_base_path(backend, DEFAULT_BASE_PATH)
    }

    pub fn with_base_path(backend: MockBackend, base_path: &str) -> Self {
        Self {
            backend,
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, anyhow::Error> {
        let mut request = MockRequest::new(Method::GET, self.collection_path(collection));
        for (field, value) in query {
            request = request.with_query(*field, value.clone());
        }

        let response = self.send(request).await?;
        expect_status(&response, StatusCode::OK, collection)?;

        let records: Vec<Value> = serde_json::from_value(response.body)?;
        let items = records
            .into_iter()
            .filter_map(|record| match T::deserialize(&record) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!(
                        "Skipping unreadable record in {}: {} ({})",
                        collection,
                        e,
                        record
                    );
                    None
                }
            })
            .collect();

        Ok(items)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: u64,
    ) -> Result<Option<T>, anyhow::Error> {
        let request = MockRequest::new(Method::GET, self.record_path(collection, id));
        let response = self.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        expect_status(&response, StatusCode::OK, collection)?;

        Ok(Some(serde_json::from_value(response.body)?))
    }

    pub async fn create<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: Collection,
        body: &B,
    ) -> Result<T, anyhow::Error> {
        let request = MockRequest::new(Method::POST, self.collection_path(collection))
            .with_body(serde_json::to_value(body)?);
        let response = self.send(request).await?;
        expect_status(&response, StatusCode::CREATED, collection)?;

        Ok(serde_json::from_value(response.body)?)
    }

    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: Collection,
        id: u64,
        patch: &B,
    ) -> Result<Option<T>, anyhow::Error> {
        let request = MockRequest::new(Method::PUT, self.record_path(collection, id))
            .with_body(serde_json::to_value(patch)?);
        let response = self.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        expect_status(&response, StatusCode::OK, collection)?;

        Ok(Some(serde_json::from_value(response.body)?))
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, collection: Collection, id: u64) -> Result<bool, anyhow::Error> {
        let request = MockRequest::new(Method::DELETE, self.record_path(collection, id));
        let response = self.send(request).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        expect_status(&response, StatusCode::OK, collection)?;

        Ok(true)
    }

    async fn send(&self, request: MockRequest) -> Result<MockResponse, anyhow::Error> {
        match self.backend.dispatch(request).await? {
            Dispatch::Handled(response) => Ok(response),
            Dispatch::Passthrough(request) => {
                bail!("No backend available for {} {}", request.method, request.path)
            }
        }
    }

    fn collection_path(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_path, collection.name())
    }

    fn record_path(&self, collection: Collection, id: u64) -> String {
        format!("{}/{}/{}", self.base_path, collection.name(), id)
    }
}

fn expect_status(
    response: &MockResponse,
    expected: StatusCode,
    collection: Collection,
) -> Result<(), anyhow::Error> {
    if response.status != expected {
        bail!(
            "Unexpected status {} from {}: {}",
            response.status,
            collection,
            error_details(&response.body)
        );
    }

    Ok(())
}

fn error_details(body: &Value) -> String {
    body.get("details")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
