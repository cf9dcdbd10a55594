//! Age-based eviction sweep.

use std::time::Duration;

use chrono::Utc;
use offbox_backend::CacheStorage;
use offbox_core::GenerationRole;
use serde::Serialize;
use tracing::{info, warn};

use crate::metrics;
use crate::store::CacheStore;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries inspected.
    pub scanned: u64,
    /// Entries deleted.
    pub removed: u64,
}

/// Deletes every entry of the current generations older than `cleanup_age`.
///
/// Entries without a stamp are kept. Failures on one entry or one generation
/// are logged and skipped.
pub async fn sweep<S>(store: &CacheStore<S>, cleanup_age: Duration) -> SweepReport
where
    S: CacheStorage,
{
    let now = Utc::now();
    let mut report = SweepReport::default();

    for role in GenerationRole::ALL {
        let keys = match store.keys(role).await {
            Ok(keys) => keys,
            Err(error) => {
                warn!(generation = %role, %error, "failed to list entries for sweep");
                continue;
            }
        };

        for key in keys {
            report.scanned += 1;
            let Some(entry) = store.lookup(role, &key).await else {
                continue;
            };
            let expired = entry
                .meta()
                .age_at(now)
                .is_some_and(|age| age > cleanup_age);
            if !expired {
                continue;
            }
            match store.delete(role, &key).await {
                Ok(status) if status.is_deleted() => report.removed += 1,
                Ok(_) => {}
                Err(error) => warn!(generation = %role, %key, %error, "failed to evict entry"),
            }
        }
    }

    metrics::record_swept(report.removed);
    info!(scanned = report.scanned, removed = report.removed, "eviction sweep finished");
    report
}
