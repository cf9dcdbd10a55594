//! In-memory named cache storage for offbox.
//!
//! [`MokaStorage`] implements [`CacheStorage`](offbox_backend::CacheStorage)
//! with one [Moka](https://docs.rs/moka) async cache per cache name.
//!
//! ```
//! use offbox_moka::MokaStorage;
//!
//! let storage = MokaStorage::builder().max_entries(10_000).build();
//! ```

mod builder;
mod storage;

pub use builder::{ByteCapacity, EntryCapacity, MokaStorageBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
pub use storage::MokaStorage;
