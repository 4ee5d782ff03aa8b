use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// HTTP client trait for abstracting the GET requests made by key sources.
///
/// A non-2xx status is a successful exchange at this layer; callers decide
/// what a status means.
pub trait HttpClient: Clone + Send + Sync + 'static {
    fn get(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// reqwest-backed client used outside of tests.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    fn classify_error(e: &reqwest::Error) -> HttpError {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Self::classify_error(&e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::classify_error(&e))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// A GET request as seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Mock HTTP client for testing.
///
/// Replies are keyed by endpoint (`scheme://host/path`, query ignored).
/// Unconfigured endpoints answer 404.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    replies: Arc<Mutex<HashMap<String, Result<HttpResponse, HttpError>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Endpoint key of a URL: everything but the query and fragment.
pub fn endpoint_of(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    )
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, endpoint: &str, status: u16, body: impl Into<Vec<u8>>) {
        lock(&self.replies).insert(endpoint.to_string(), Ok(HttpResponse::new(status, body)));
    }

    pub fn add_json(&self, endpoint: &str, status: u16, body: &serde_json::Value) {
        self.add_response(endpoint, status, body.to_string());
    }

    pub fn set_error(&self, endpoint: &str, error: HttpError) {
        lock(&self.replies).insert(endpoint.to_string(), Err(error));
    }

    /// Delay every reply from `endpoint` by `delay` (tokio time).
    pub fn set_delay(&self, endpoint: &str, delay: Duration) {
        lock(&self.delays).insert(endpoint.to_string(), delay);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self, endpoint: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| endpoint_of(&r.url) == endpoint)
            .count()
    }
}

impl HttpClient for MockHttpClient {
    async fn get(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse, HttpError> {
        let endpoint = endpoint_of(url);
        lock(&self.requests).push(RecordedRequest {
            url: url.clone(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let delay = lock(&self.delays).get(&endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = lock(&self.replies).get(&endpoint).cloned();
        reply.unwrap_or_else(|| Ok(HttpResponse::new(404, Vec::new())))
    }
}
