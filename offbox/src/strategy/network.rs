//! Network-led strategies.

use offbox_backend::CacheStorage;
use offbox_core::{FetchRequest, FetchResponse, GenerationRole, Network, StrategyName};
use tracing::{debug, warn};

use super::Executor;

impl<S, N> Executor<S, N>
where
    S: CacheStorage + 'static,
    N: Network,
{
    /// Always fetch; no cache I/O.
    pub async fn network_only(&self, request: &FetchRequest) -> FetchResponse {
        match self.network.fetch(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %request.uri(), %error, "network-only fetch failed");
                self.offline(StrategyName::NetworkOnly, request)
            }
        }
    }

    /// Fetch and cache; fall back to any cached copy.
    pub async fn network_first(
        &self,
        request: &FetchRequest,
        role: GenerationRole,
    ) -> FetchResponse {
        self.network_led(request, role, StrategyName::NetworkFirst)
            .await
            .unwrap_or_else(|| self.offline(StrategyName::NetworkFirst, request))
    }

    /// As [`network_first`](Self::network_first), plus the shell document for
    /// offline navigations.
    pub async fn network_first_with_fallback(
        &self,
        request: &FetchRequest,
        role: GenerationRole,
    ) -> FetchResponse {
        let strategy = StrategyName::NetworkFirstWithFallback;
        if let Some(response) = self.network_led(request, role, strategy).await {
            return response;
        }
        if request.is_navigation() {
            let shell = self.config.shell_key();
            if let Some((_, entry)) = self.cached(&shell, strategy).await {
                debug!(url = %request.uri(), shell = shell.url(), "serving shell document");
                return entry.into_response();
            }
        }
        self.offline(strategy, request)
    }

    /// Shared network-first body. `None` when the network failed and no
    /// cached copy exists.
    async fn network_led(
        &self,
        request: &FetchRequest,
        role: GenerationRole,
        strategy: StrategyName,
    ) -> Option<FetchResponse> {
        let key = request.key();
        match self.network.fetch(request).await {
            Ok(response) if response.is_ok() => {
                self.store_behind(role, key, response.clone(), strategy);
                Some(response)
            }
            Ok(response) => {
                debug!(
                    url = %request.uri(),
                    status = %response.status(),
                    "upstream returned non-ok"
                );
                match self.cached(&key, strategy).await {
                    Some((_, entry)) => Some(entry.into_response()),
                    None => Some(response),
                }
            }
            Err(error) => {
                warn!(
                    url = %request.uri(),
                    %error,
                    %strategy,
                    "network fetch failed, trying cache"
                );
                self.cached(&key, strategy)
                    .await
                    .map(|(_, entry)| entry.into_response())
            }
        }
    }
}
