//! Test doubles and fixtures for the offbox integration suite.

pub mod counting_storage;
pub mod fixture;
pub mod mock_network;
pub mod recording_host;
pub mod tracing;

pub use counting_storage::{CountingStorage, StorageCounters};
pub use fixture::{ORIGIN, TestEngine, stale_entry, url};
pub use mock_network::MockNetwork;
pub use recording_host::{HostCall, RecordingHost};
