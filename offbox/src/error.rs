use offbox_backend::StorageError;
use thiserror::Error;

/// Error returned by the engine's fallible entry points.
///
/// Request handling never returns this type: every failure on the fetch path
/// degrades to a cached copy or the synthetic offline response.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured origin lacks a scheme or an authority.
    #[error("origin {0:?} must be an absolute url")]
    InvalidOrigin(String),
    /// A configured URL could not be parsed or resolved against the origin.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parse error.
        #[source]
        source: http::Error,
    },
    /// Cache storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Host runtime call failure.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Error reported by a [`Host`](crate::host::Host) implementation.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host does not support the requested operation.
    #[error("host does not support {0}")]
    Unsupported(&'static str),
    /// The host rejected the call.
    #[error("host call failed: {0}")]
    Failed(String),
}
