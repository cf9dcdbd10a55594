use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use offbox_core::{FetchRequest, FetchResponse, Network, NetworkError};

/// In-memory upstream keyed by full URL.
///
/// Unknown URLs answer `404`. The whole network can be switched offline, and
/// single URLs can be made to fail.
#[derive(Clone, Debug, Default)]
pub struct MockNetwork {
    routes: Arc<DashMap<String, FetchResponse>>,
    failing: Arc<DashSet<String>>,
    offline: Arc<AtomicBool>,
    calls: Arc<DashMap<String, usize>>,
    total_calls: Arc<AtomicUsize>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `response` for `url`.
    pub fn route(&self, url: impl Into<String>, response: FetchResponse) -> &Self {
        self.routes.insert(url.into(), response);
        self
    }

    /// Serves a `200` with `body` and a matching `content-length`.
    pub fn ok(&self, url: impl Into<String>, body: impl Into<Bytes>) -> &Self {
        let body = body.into();
        let response = FetchResponse::ok(body.clone())
            .with_header(CONTENT_LENGTH, HeaderValue::from(body.len()))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        self.route(url, response)
    }

    /// Serves `status` with an empty body.
    pub fn status(&self, url: impl Into<String>, status: StatusCode) -> &Self {
        self.route(url, FetchResponse::new(status, Bytes::new()))
    }

    /// Makes every fetch of `url` fail.
    pub fn fail(&self, url: impl Into<String>) -> &Self {
        self.failing.insert(url.into());
        self
    }

    /// Switches the whole network on or off.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fetches of `url` so far.
    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|count| *count).unwrap_or(0)
    }

    /// Fetches of any URL so far.
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.clear();
        self.total_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        let url = request.href();
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.entry(url.clone()).or_insert(0) += 1;

        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable("network is offline".to_owned()));
        }
        if self.failing.contains(&url) {
            return Err(NetworkError::Unreachable(format!("{url} is unreachable")));
        }
        Ok(self
            .routes
            .get(&url)
            .map(|response| response.value().clone())
            .unwrap_or_else(|| FetchResponse::new(StatusCode::NOT_FOUND, Bytes::new())))
    }
}
