#![warn(missing_docs)]
//! # offbox-core
//!
//! Core types for the offbox offline caching engine.
//!
//! This crate is **host-agnostic**: it knows nothing about browsers, workers
//! or a particular HTTP client. It defines the vocabulary that the engine
//! (`offbox`), storage implementations (`offbox-moka`) and network adapters
//! (`offbox-reqwest`) share:
//!
//! - [`FetchRequest`] / [`Destination`] - an intercepted request
//! - [`FetchResponse`] - a fully buffered response, cheap to clone
//! - [`EntryKey`] - method + URL identifying a cached response
//! - [`CacheEntry`] / [`EntryMeta`] - a stored response and its companion metadata
//! - [`StrategyName`] - the five request strategies
//! - [`GenerationRole`] / [`GenerationNames`] - versioned cache generations
//! - [`Network`] - the upstream the engine fetches from

pub mod entry;
pub mod generation;
pub mod key;
pub mod network;
pub mod request;
pub mod response;
pub mod strategy;

pub use entry::{CacheEntry, EntryMeta};
pub use generation::{GenerationNames, GenerationRole};
pub use key::EntryKey;
pub use network::{Network, NetworkError};
pub use request::{Destination, FetchRequest};
pub use response::FetchResponse;
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use strategy::StrategyName;

/// Raw response body type.
/// Using `Bytes` keeps clones of cached bodies reference counted.
pub type Raw = bytes::Bytes;
