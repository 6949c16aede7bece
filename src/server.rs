//! Request interception for the mock REST surface.
//!
//! Calls addressed to one of the known collections are answered in-process
//! by an axum router over the [`MockStore`]; everything else is handed back
//! untouched so the caller can decide what to do with it.

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::store::{Collection, MockStore};

mod collections;

const API_PREFIX: &str = "/api";

#[derive(Clone, Debug)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl MockRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((field.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug)]
pub enum Dispatch {
    Handled(MockResponse),
    Passthrough(MockRequest),
}

#[derive(Clone)]
pub struct MockBackend {
    store: MockStore,
    router: Router,
}

impl MockBackend {
    pub fn new(store: MockStore) -> Self {
        let router = collections::routes(store.clone());

        Self { store, router }
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }

    /// Whether a call would be answered by this backend.
    pub fn intercepts(method: &Method, path: &str) -> bool {
        let handled_method = [Method::GET, Method::POST, Method::PUT, Method::DELETE]
            .iter()
            .any(|candidate| candidate == method);

        handled_method && collection_of(path).is_some()
    }

    pub async fn dispatch(&self, request: MockRequest) -> Result<Dispatch, anyhow::Error> {
        if !Self::intercepts(&request.method, &request.path) {
            log::debug!(
                "Passing through {} {}: not a mock collection.",
                request.method,
                request.path
            );
            return Ok(Dispatch::Passthrough(request));
        }

        let http_request = build_http_request(&request)?;
        let response = self.router.clone().oneshot(http_request).await?;

        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        log::debug!("{} {} -> {}", request.method, request.path, status);
        Ok(Dispatch::Handled(MockResponse { status, body }))
    }
}

fn strip_prefix(path: &str) -> &str {
    match path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

fn collection_of(path: &str) -> Option<Collection> {
    let path = strip_prefix(path.split('?').next().unwrap_or_default());
    let mut segments = path.trim_start_matches('/').split('/');
    let collection = Collection::from_name(segments.next()?)?;

    match (segments.next(), segments.next()) {
        (None, _) => Some(collection),
        (Some(id), None) if !id.is_empty() => Some(collection),
        _ => None,
    }
}

fn build_http_request(request: &MockRequest) -> Result<Request<Body>, anyhow::Error> {
    let mut uri = strip_prefix(&request.path).to_string();
    if !request.query.is_empty() {
        let query: Vec<String> = request
            .query
            .iter()
            .map(|(field, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(field),
                    urlencoding::encode(value)
                )
            })
            .collect();
        uri.push('?');
        uri.push_str(&query.join("&"));
    }

    let body = if request.method == Method::POST || request.method == Method::PUT {
        match &request.body {
            Some(body) => Body::from(serde_json::to_vec(body)?),
            None => Body::from("{}"),
        }
    } else {
        Body::empty()
    };

    let http_request = Request::builder()
        .method(request.method.clone())
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)?;

    Ok(http_request)
}
