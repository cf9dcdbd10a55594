use offbox::EngineError;
use thiserror::Error;

/// Error turning a configuration file into engine types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML for the configuration model.
    #[error("invalid configuration: {0}")]
    Yaml(String),
    /// A `Url` matcher does not compile.
    #[error("invalid url pattern {pattern:?}: {source}")]
    InvalidRegex {
        /// The pattern as written.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },
    /// A `Method` matcher is not an HTTP method.
    #[error("invalid method {0:?}")]
    InvalidMethod(String),
    /// The origin is not a URI.
    #[error("invalid origin {0:?}")]
    InvalidOrigin(String),
    /// A rule has no matchers and would never apply.
    #[error("rule {0:?} has no matchers")]
    EmptyMatcherList(String),
    /// A storage type was requested whose feature is disabled.
    #[error("storage {0} is not available, enable its feature")]
    StorageNotAvailable(String),
    /// The engine rejected the resulting configuration.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
