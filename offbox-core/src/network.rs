//! Network upstream trait.
//!
//! [`Network`] is the engine's only way to reach the outside world. Host
//! adapters implement it over their fetch primitive (`offbox-reqwest` over
//! `reqwest`, tests over an in-memory map).

use std::sync::Arc;

use async_trait::async_trait;

use crate::request::FetchRequest;
use crate::response::FetchResponse;

/// Error returned by a [`Network`] fetch.
///
/// Every variant is treated the same way by the strategies: as a network
/// failure that triggers the fallback path.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The upstream could not be reached (offline, DNS, connection refused).
    #[error("network unreachable: {0}")]
    Unreachable(String),
    /// The request could not be turned into a network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Any other transport error.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

/// The upstream the engine fetches from.
///
/// A non-2xx status is **not** an error: implementations return such responses
/// as `Ok` and let the strategies decide what to do with them.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the request.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}

#[async_trait]
impl<N> Network for Arc<N>
where
    N: Network + ?Sized,
{
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        (**self).fetch(request).await
    }
}

#[async_trait]
impl Network for Box<dyn Network> {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        (**self).fetch(request).await
    }
}
