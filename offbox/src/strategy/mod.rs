//! Strategy executors.
//!
//! One algorithm per [`StrategyName`]. Every executor resolves to a response:
//! network and storage failures degrade to a cached copy or to
//! [`FetchResponse::offline`], they are never returned as errors.
//!
//! Lookups search every current generation (static, dynamic, runtime); writes
//! go to the route's generation and happen behind the response through the
//! [`OffloadManager`].

mod cache;
mod network;

use std::sync::Arc;

use offbox_backend::CacheStorage;
use offbox_core::{
    CacheEntry, EntryKey, FetchRequest, FetchResponse, GenerationRole, Network, StrategyName,
};
use tracing::{debug, warn};

use crate::classifier::Route;
use crate::config::EngineConfig;
use crate::metrics;
use crate::offload::{OffloadManager, TaskKind};
use crate::store::CacheStore;

/// Runs strategies against a store and a network.
pub struct Executor<S, N> {
    store: CacheStore<S>,
    network: Arc<N>,
    offload: OffloadManager,
    config: Arc<EngineConfig>,
}

impl<S, N> Clone for Executor<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            network: Arc::clone(&self.network),
            offload: self.offload.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, N> std::fmt::Debug for Executor<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("generations", self.store.generations())
            .field("offload", &self.offload)
            .finish()
    }
}

impl<S, N> Executor<S, N>
where
    S: CacheStorage + 'static,
    N: Network,
{
    /// Creates an executor.
    pub fn new(
        store: CacheStore<S>,
        network: Arc<N>,
        offload: OffloadManager,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            store,
            network,
            offload,
            config,
        }
    }

    /// Runs the strategy selected by `route`.
    ///
    /// A caching strategy routed without a generation behaves as
    /// network-only.
    pub async fn execute(&self, request: &FetchRequest, route: &Route) -> FetchResponse {
        metrics::record_route(route.strategy);
        let role = match (route.strategy, route.role) {
            (StrategyName::NetworkOnly, _) | (_, None) => return self.network_only(request).await,
            (_, Some(role)) => role,
        };
        match route.strategy {
            StrategyName::NetworkFirst => self.network_first(request, role).await,
            StrategyName::NetworkFirstWithFallback => {
                self.network_first_with_fallback(request, role).await
            }
            StrategyName::CacheFirst => self.cache_first(request, role).await,
            StrategyName::CacheFirstVersioned => self.cache_first_versioned(request, role).await,
            StrategyName::NetworkOnly => self.network_only(request).await,
        }
    }

    /// Stamps `response` and writes it without delaying the caller.
    fn store_behind(
        &self,
        role: GenerationRole,
        key: EntryKey,
        response: FetchResponse,
        strategy: StrategyName,
    ) {
        let store = self.store.clone();
        let entry = CacheEntry::stamped(response, strategy);
        self.offload.spawn(TaskKind::CacheWrite, async move {
            let cache = store.generations().name(role).to_owned();
            match store.write(role, key.clone(), entry).await {
                Ok(()) => debug!(%cache, %key, "cached response"),
                Err(error) => warn!(%cache, %key, %error, "cache write failed"),
            }
        });
    }

    /// The synthetic offline response, counted.
    fn offline(&self, strategy: StrategyName, request: &FetchRequest) -> FetchResponse {
        debug!(url = %request.uri(), %strategy, "serving offline response");
        metrics::record_offline(strategy);
        FetchResponse::offline()
    }

    /// Any cached copy of `key`, counted as hit or miss.
    async fn cached(
        &self,
        key: &EntryKey,
        strategy: StrategyName,
    ) -> Option<(GenerationRole, CacheEntry)> {
        let found = self.store.lookup_any(key).await;
        metrics::record_lookup(strategy, found.is_some());
        found
    }
}
