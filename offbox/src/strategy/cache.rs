//! Cache-led strategies.

use offbox_backend::CacheStorage;
use offbox_core::{FetchRequest, FetchResponse, GenerationRole, Network, StrategyName};
use tracing::{debug, warn};

use super::Executor;

impl<S, N> Executor<S, N>
where
    S: CacheStorage + 'static,
    N: Network,
{
    /// Serve any cached copy; otherwise fetch and cache.
    pub async fn cache_first(
        &self,
        request: &FetchRequest,
        role: GenerationRole,
    ) -> FetchResponse {
        let strategy = StrategyName::CacheFirst;
        let key = request.key();
        if let Some((_, entry)) = self.cached(&key, strategy).await {
            return entry.into_response();
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store_behind(role, key, response.clone(), strategy);
                }
                response
            }
            Err(error) => {
                warn!(url = %request.uri(), %error, "cache-first fetch failed");
                self.offline(strategy, request)
            }
        }
    }

    /// Serve a cached copy while it is within the max-age of the target
    /// generation `role`; otherwise refetch, falling back to the stale copy.
    pub async fn cache_first_versioned(
        &self,
        request: &FetchRequest,
        role: GenerationRole,
    ) -> FetchResponse {
        let strategy = StrategyName::CacheFirstVersioned;
        let key = request.key();
        let max_age = self.config.freshness().max_age(role);
        let stale = match self.cached(&key, strategy).await {
            Some((_, entry)) => {
                if entry.is_fresh(max_age) {
                    return entry.into_response();
                }
                debug!(
                    url = %request.uri(),
                    age = ?entry.age(),
                    ?max_age,
                    "cached entry expired"
                );
                Some(entry)
            }
            None => None,
        };

        match self.network.fetch(request).await {
            Ok(response) if response.is_ok() => {
                self.store_behind(role, key, response.clone(), strategy);
                response
            }
            Ok(response) => stale.map_or(response, |entry| entry.into_response()),
            Err(error) => {
                warn!(url = %request.uri(), %error, "refetch failed");
                match stale {
                    Some(entry) => entry.into_response(),
                    None => self.offline(strategy, request),
                }
            }
        }
    }
}
