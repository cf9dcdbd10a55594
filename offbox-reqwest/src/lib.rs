//! [`reqwest`] upstream for the offbox engine.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use http::Uri;
//! use offbox::{Engine, EngineConfig, NoopHost};
//! use offbox_moka::MokaStorage;
//! use offbox_reqwest::ReqwestNetwork;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::builder(Uri::from_static("https://app.example")).build()?;
//! let engine = Engine::new(
//!     config,
//!     Arc::new(MokaStorage::builder().max_entries(1_000).build()),
//!     Arc::new(ReqwestNetwork::new(reqwest::Client::new())),
//!     Arc::new(NoopHost),
//! );
//! # let _ = engine;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use async_trait::async_trait;
use offbox_core::{FetchRequest, FetchResponse, Network, NetworkError};
use tracing::debug;

/// [`Network`] implementation over a [`reqwest::Client`].
///
/// Bodies are buffered in full. Any status is returned as `Ok`; only
/// transport failures become [`NetworkError`]s.
#[derive(Debug, Clone, Default)]
pub struct ReqwestNetwork {
    client: reqwest::Client,
}

impl ReqwestNetwork {
    /// Wraps a configured client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn build_request(&self, request: &FetchRequest) -> Result<reqwest::Request, NetworkError> {
        self.client
            .request(request.method().clone(), request.href())
            .headers(request.headers().clone())
            .build()
            .map_err(into_network_error)
    }
}

#[async_trait]
impl Network for ReqwestNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        let outgoing = self.build_request(request)?;
        let response = self
            .client
            .execute(outgoing)
            .await
            .map_err(into_network_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(into_network_error)?;
        debug!(url = %request.uri(), %status, size = body.len(), "upstream responded");

        let mut fetched = FetchResponse::new(status, body);
        *fetched.headers_mut() = headers;
        Ok(fetched)
    }
}

fn into_network_error(error: reqwest::Error) -> NetworkError {
    if error.is_connect() || error.is_timeout() {
        NetworkError::Unreachable(error.to_string())
    } else if error.is_builder() {
        NetworkError::InvalidRequest(error.to_string())
    } else {
        NetworkError::Transport(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use http::header::ACCEPT;
    use http::{HeaderValue, Method};

    use super::*;

    #[test]
    fn request_keeps_method_url_and_headers() {
        let network = ReqwestNetwork::default();
        let request = FetchRequest::get("https://app.example/api/scores?round=2")
            .unwrap()
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));

        let built = network.build_request(&request).unwrap();

        assert_eq!(built.method(), Method::GET);
        assert_eq!(built.url().as_str(), "https://app.example/api/scores?round=2");
        assert_eq!(built.headers()[ACCEPT], "application/json");
    }
}
