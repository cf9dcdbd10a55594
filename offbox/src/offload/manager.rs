use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

use super::policy::{OffloadConfig, TimeoutPolicy};

/// What a background task does. Used as span field and metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Write-behind store of a fetched response.
    CacheWrite,
    /// Deletion of every cache requested over the control channel.
    ClearCache,
}

impl TaskKind {
    /// Label of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::CacheWrite => "cache-write",
            TaskKind::ClearCache => "clear-cache",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Pending {
    kind: TaskKind,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct Shared {
    config: OffloadConfig,
    pending: DashMap<u64, Pending>,
    next_id: AtomicU64,
}

/// Removes a task from the table when its future is dropped, whether it
/// completed, panicked or was aborted.
struct Registration {
    shared: Arc<Shared>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.shared.pending.remove(&self.id);
    }
}

/// Runs work that must not hold back a response.
///
/// Every spawned task stays registered until it ends, so [`wait_all`] can
/// tell when the caches have caught up with the responses already served.
/// Clones share the same task table.
///
/// [`wait_all`]: Self::wait_all
#[derive(Clone, Debug, Default)]
pub struct OffloadManager {
    shared: Arc<Shared>,
}

impl OffloadManager {
    /// Manager applying `config` to every task.
    pub fn new(config: OffloadConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                ..Shared::default()
            }),
        }
    }

    /// Starts `task` on the runtime and returns its id.
    pub fn spawn<F>(&self, kind: TaskKind, task: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        crate::metrics::record_offload_spawned(kind);

        let registration = Registration {
            shared: Arc::clone(&self.shared),
            id,
        };
        // The task must not finish before its handle is in the table.
        let (registered, wait_registered) = oneshot::channel::<()>();
        let policy = self.shared.config.timeout_policy;
        let span = info_span!("offload_task", kind = %kind, id);
        let handle = tokio::spawn(
            async move {
                let _registration = registration;
                let _ = wait_registered.await;
                let started = Instant::now();
                run_with_policy(policy, task).await;
                crate::metrics::record_offload_completed(kind, started.elapsed());
            }
            .instrument(span),
        );
        self.shared.pending.insert(id, Pending { kind, handle });
        let _ = registered.send(());
        id
    }

    /// Tasks not finished yet.
    pub fn active_task_count(&self) -> usize {
        self.shared.pending.len()
    }

    /// Aborts every pending task.
    pub fn cancel_all(&self) {
        let aborted: Vec<_> = self
            .shared
            .pending
            .iter()
            .map(|task| (task.kind, *task.key(), task.handle.abort_handle()))
            .collect();
        for (kind, id, handle) in aborted {
            debug!(%kind, id, "aborting offload task");
            handle.abort();
        }
        self.shared.pending.clear();
    }

    /// Resolves once no task is pending, including tasks spawned while waiting.
    pub async fn wait_all(&self) {
        while !self.shared.pending.is_empty() {
            tokio::task::yield_now().await;
        }
    }

    /// As [`wait_all`](Self::wait_all) with a deadline. `false` on timeout.
    pub async fn wait_all_timeout(&self, deadline: Duration) -> bool {
        tokio::time::timeout(deadline, self.wait_all()).await.is_ok()
    }
}

async fn run_with_policy<F>(policy: TimeoutPolicy, task: F)
where
    F: Future<Output = ()>,
{
    match policy {
        TimeoutPolicy::None => task.await,
        TimeoutPolicy::Cancel(deadline) => {
            if tokio::time::timeout(deadline, task).await.is_err() {
                warn!(deadline_ms = deadline.as_millis(), "offload task dropped at deadline");
            }
        }
        TimeoutPolicy::Warn(threshold) => {
            let started = Instant::now();
            task.await;
            let elapsed = started.elapsed();
            if elapsed > threshold {
                warn!(
                    elapsed_ms = elapsed.as_millis(),
                    threshold_ms = threshold.as_millis(),
                    "slow offload task"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_all_sees_every_task_finish() {
        let manager = OffloadManager::default();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        manager.spawn(TaskKind::CacheWrite, async move {
            let _ = rx.await;
        });
        assert_eq!(manager.active_task_count(), 1);

        tx.send(()).unwrap();
        manager.wait_all().await;
        assert_eq!(manager.active_task_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn finished_tasks_leave_the_table_without_waiting() {
        let manager = OffloadManager::default();

        for _ in 0..20_000 {
            manager.spawn(TaskKind::CacheWrite, async {});
        }

        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while manager.active_task_count() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(drained.is_ok(), "{} tasks still registered", manager.active_task_count());
    }

    #[tokio::test]
    async fn panicking_tasks_are_deregistered() {
        let manager = OffloadManager::default();

        manager.spawn(TaskKind::CacheWrite, async { panic!("write failed") });

        assert!(manager.wait_all_timeout(Duration::from_secs(1)).await);
        assert_eq!(manager.active_task_count(), 0);
    }

    #[tokio::test]
    async fn cancel_policy_drops_slow_tasks() {
        let manager = OffloadManager::new(OffloadConfig::cancel_after(Duration::from_millis(10)));

        manager.spawn(TaskKind::ClearCache, std::future::pending());

        assert!(manager.wait_all_timeout(Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn cancel_all_empties_the_table() {
        let manager = OffloadManager::default();
        manager.spawn(TaskKind::CacheWrite, std::future::pending());

        manager.cancel_all();

        assert_eq!(manager.active_task_count(), 0);
        assert!(manager.wait_all_timeout(Duration::from_secs(1)).await);
    }
}
