//! The engine: one entry point per host event.

use std::sync::Arc;

use chrono::Utc;
use offbox_backend::CacheStorage;
use offbox_core::{FetchRequest, FetchResponse, Network};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::control::{ControlMessage, ReplyPort, error_reply};
use crate::error::{EngineError, HostError};
use crate::event::{Event, EventOutcome};
use crate::host::{Host, NoopHost};
use crate::lifecycle::{ActivationReport, InstallReport, Lifecycle, LifecycleState};
use crate::notification::{EXPLORE_ACTION, Notification};
use crate::offload::{OffloadManager, TaskKind};
use crate::stats::{self, CacheStats};
use crate::store::CacheStore;
use crate::strategy::Executor;

/// Offline caching engine over a storage `S`, a network `N` and a host `H`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use http::Uri;
/// use offbox::{Engine, EngineConfig, NoopHost};
/// use offbox::offbox_core::{FetchRequest, Network};
/// use offbox::offbox_backend::CacheStorage;
///
/// # async fn run<S: CacheStorage + 'static, N: Network>(storage: S, network: N) {
/// let config = EngineConfig::builder(Uri::from_static("https://app.example"))
///     .build()
///     .unwrap();
/// let engine = Engine::new(config, Arc::new(storage), Arc::new(network), Arc::new(NoopHost));
///
/// engine.install().await.unwrap();
/// engine.activate().await;
///
/// let request = FetchRequest::get("https://app.example/logos/logo_circulo.png").unwrap();
/// let response = engine.handle_fetch(&request).await;
/// # let _ = response;
/// # }
/// ```
pub struct Engine<S, N, H = NoopHost> {
    config: Arc<EngineConfig>,
    classifier: Classifier,
    store: CacheStore<S>,
    executor: Executor<S, N>,
    lifecycle: Lifecycle<S, N, H>,
    host: Arc<H>,
    offload: OffloadManager,
}

impl<S, N, H> std::fmt::Debug for Engine<S, N, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("offload", &self.offload)
            .finish_non_exhaustive()
    }
}

impl<S, N, H> Engine<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: Host,
{
    /// Wires the engine together.
    pub fn new(config: EngineConfig, storage: Arc<S>, network: Arc<N>, host: Arc<H>) -> Self {
        let config = Arc::new(config);
        let store = CacheStore::new(storage, config.generations().clone());
        let offload = OffloadManager::new(config.offload().clone());
        let executor = Executor::new(
            store.clone(),
            Arc::clone(&network),
            offload.clone(),
            Arc::clone(&config),
        );
        let lifecycle = Lifecycle::new(
            store.clone(),
            network,
            Arc::clone(&host),
            Arc::clone(&config),
        );
        Self {
            classifier: Classifier::new(config.rules().clone()),
            config,
            store,
            executor,
            lifecycle,
            host,
            offload,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generation-aware cache store.
    pub fn store(&self) -> &CacheStore<S> {
        &self.store
    }

    /// Lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Handles any host event.
    #[instrument(skip_all, fields(event = event.kind()))]
    pub async fn dispatch(&self, event: Event) -> EventOutcome {
        match event {
            Event::Install => match self.install().await {
                Ok(report) => EventOutcome::Installed(report),
                Err(error) => EventOutcome::Failed(error),
            },
            Event::Activate => EventOutcome::Activated(self.activate().await),
            Event::Fetch(request) => match self.handle_fetch(&request).await {
                Some(response) => EventOutcome::Response(response),
                None => EventOutcome::Passthrough,
            },
            Event::Message { data, reply } => match self.handle_message(&data, reply).await {
                Some(message) => EventOutcome::Control(message),
                None => EventOutcome::Ignored,
            },
            Event::Sync(tag) => {
                if self.background_sync(&tag).await {
                    EventOutcome::Synced
                } else {
                    EventOutcome::Ignored
                }
            }
            Event::Push(payload) => match self.push(payload.as_deref()).await {
                Ok(notification) => EventOutcome::Notified(notification),
                Err(error) => EventOutcome::Failed(error.into()),
            },
            Event::NotificationClick(action) => {
                match self.notification_click(action.as_deref()).await {
                    Ok(Some(url)) => EventOutcome::WindowOpened(url),
                    Ok(None) => EventOutcome::NotificationClosed,
                    Err(error) => EventOutcome::Failed(error.into()),
                }
            }
        }
    }

    /// Answers an intercepted request.
    ///
    /// `None` means the request is not handled by the engine and must go to
    /// the network untouched.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Option<FetchResponse> {
        let route = self.classifier.classify(request)?;
        Some(self.executor.execute(request, &route).await)
    }

    /// Precaches the manifest. See [`Lifecycle::install`].
    pub async fn install(&self) -> Result<InstallReport, EngineError> {
        self.lifecycle.install().await
    }

    /// Removes stale generations and old entries. See [`Lifecycle::activate`].
    pub async fn activate(&self) -> ActivationReport {
        self.lifecycle.activate().await
    }

    /// Handles a control message. Returns the message if it was recognised.
    ///
    /// `CLEAR_CACHE` runs in the background; use [`settle`](Self::settle) to
    /// wait for it.
    pub async fn handle_message(
        &self,
        data: &Value,
        reply: Option<ReplyPort>,
    ) -> Option<ControlMessage> {
        let Some(message) = ControlMessage::parse(data) else {
            debug!(?data, "ignoring unknown control message");
            return None;
        };
        info!(message = message.as_str(), "control message");

        match message {
            ControlMessage::SkipWaiting => {
                if let Err(error) = self.host.skip_waiting().await {
                    warn!(%error, "skip waiting failed");
                }
            }
            ControlMessage::ClearCache => {
                let store = self.store.clone();
                self.offload.spawn(TaskKind::ClearCache, async move {
                    clear_all(&store).await;
                });
            }
            ControlMessage::GetCacheStats => {
                let body = match self.stats().await {
                    Ok(stats) => {
                        serde_json::to_value(stats).unwrap_or_else(|error| error_reply(error))
                    }
                    Err(error) => {
                        warn!(%error, "failed to collect cache stats");
                        error_reply(error)
                    }
                };
                match reply {
                    Some(port) => {
                        if port.send(body).is_err() {
                            debug!("stats reply port closed");
                        }
                    }
                    None => debug!("stats requested without a reply port"),
                }
            }
        }
        Some(message)
    }

    /// Collects statistics over the current generations.
    pub async fn stats(&self) -> Result<CacheStats, EngineError> {
        stats::collect(&self.store).await
    }

    /// Deletes every cache in storage. Returns how many were deleted.
    pub async fn clear_caches(&self) -> usize {
        clear_all(&self.store).await
    }

    /// Runs background sync when `tag` is the configured sync tag.
    pub async fn background_sync(&self, tag: &str) -> bool {
        if tag != self.config.sync_tag() {
            debug!(tag, "ignoring sync tag");
            return false;
        }
        info!(tag, "running background sync");
        true
    }

    /// Shows the notification for a push.
    pub async fn push(&self, payload: Option<&str>) -> Result<Notification, HostError> {
        let notification = self.config.notifications().render(payload, Utc::now());
        self.host.show_notification(notification.clone()).await?;
        Ok(notification)
    }

    /// Reacts to a notification click. Returns the URL opened, if any.
    pub async fn notification_click(
        &self,
        action: Option<&str>,
    ) -> Result<Option<String>, HostError> {
        if action != Some(EXPLORE_ACTION) {
            return Ok(None);
        }
        let url = self.config.notifications().explore_url.clone();
        self.host.open_window(&url).await?;
        Ok(Some(url))
    }

    /// `true` when any current generation holds an entry for `url`.
    pub async fn has_cached(&self, url: &str) -> bool {
        self.store.has_cached(url).await
    }

    /// Waits for pending background writes.
    pub async fn settle(&self) {
        self.offload.wait_all().await;
    }
}

async fn clear_all<S>(store: &CacheStore<S>) -> usize
where
    S: CacheStorage,
{
    let names = match store.cache_names().await {
        Ok(names) => names,
        Err(error) => {
            warn!(%error, "failed to list caches to clear");
            return 0;
        }
    };
    let mut deleted = 0;
    for name in names {
        match store.delete_cache(&name).await {
            Ok(true) => deleted += 1,
            Ok(false) => {}
            Err(error) => warn!(cache = %name, %error, "failed to delete cache"),
        }
    }
    info!(deleted, "cleared caches");
    deleted
}
