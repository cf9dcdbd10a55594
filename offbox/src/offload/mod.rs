//! Background task execution for write-behind cache updates.
//!
//! Strategies return their response as soon as it is known and hand the cache
//! write to the [`OffloadManager`]. `CLEAR_CACHE` runs the same way.
//!
//! # Example
//!
//! ```
//! use offbox::offload::{OffloadConfig, OffloadManager, TaskKind};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = OffloadManager::new(OffloadConfig::warn_after(Duration::from_secs(5)));
//!
//! manager.spawn(TaskKind::CacheWrite, async {
//!     // write the entry
//! });
//! manager.wait_all().await;
//! assert_eq!(manager.active_task_count(), 0);
//! # }
//! ```

mod manager;
mod policy;

pub use manager::{OffloadManager, TaskKind};
pub use policy::{OffloadConfig, TimeoutPolicy};
