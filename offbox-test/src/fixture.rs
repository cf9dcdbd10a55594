use std::sync::Arc;

use http::Uri;
use offbox::{Engine, EngineConfig, EngineConfigBuilder};
use offbox_backend::CacheStorage;
use offbox_core::{CacheEntry, EntryKey, EntryMeta, FetchRequest, FetchResponse, StrategyName};
use offbox_configuration::ConfigStorage;
use offbox_moka::MokaStorage;

use crate::{CountingStorage, MockNetwork, RecordingHost};

pub const ORIGIN: &str = "https://app.example";

/// Absolute URL of `path` under [`ORIGIN`].
pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

/// An entry stamped `age` ago.
pub fn stale_entry(body: &'static str, age: chrono::Duration) -> CacheEntry {
    CacheEntry::new(
        FetchResponse::ok(body),
        EntryMeta {
            cached_at: Some(chrono::Utc::now() - age),
            strategy: Some(StrategyName::CacheFirstVersioned),
        },
    )
}

pub type TestStorage = CountingStorage<MokaStorage>;

/// An engine over moka storage, a mock network and a recording host.
pub struct TestEngine {
    pub engine: Engine<TestStorage, MockNetwork, RecordingHost>,
    pub storage: Arc<TestStorage>,
    pub network: Arc<MockNetwork>,
    pub host: Arc<RecordingHost>,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(|builder| builder)
    }

    pub fn with_config(configure: impl FnOnce(EngineConfigBuilder) -> EngineConfigBuilder) -> Self {
        crate::tracing::init();
        let config = configure(EngineConfig::builder(Uri::from_static(ORIGIN)))
            .build()
            .expect("test config must be valid");
        let storage = CountingStorage::new(MokaStorage::builder().max_entries(1_000).build());
        Self::with_parts(config, Arc::new(storage), Arc::new(MockNetwork::new()))
    }

    /// Engine configured from a YAML document. Its storage section is
    /// honoured and wrapped in [`CountingStorage`].
    pub fn from_yaml(yaml: &str) -> Self {
        crate::tracing::init();
        let document = offbox_configuration::from_yaml(yaml).expect("test yaml must parse");
        let ConfigStorage::Moka(moka) = document.storage();
        let storage = moka.into_storage().expect("moka feature is enabled");
        let config = document
            .into_engine_config()
            .expect("test yaml must be a valid configuration");
        Self::with_parts(
            config,
            Arc::new(CountingStorage::new(storage)),
            Arc::new(MockNetwork::new()),
        )
    }

    pub fn with_parts(
        config: EngineConfig,
        storage: Arc<TestStorage>,
        network: Arc<MockNetwork>,
    ) -> Self {
        let host = Arc::new(RecordingHost::with_clients(2));
        let engine = Engine::new(
            config,
            Arc::clone(&storage),
            Arc::clone(&network),
            Arc::clone(&host),
        );
        Self {
            engine,
            storage,
            network,
            host,
        }
    }

    /// Routes every precache URL to a `200`.
    pub fn serve_manifest(&self) -> &Self {
        for uri in self.engine.config().precache() {
            let href = uri.to_string();
            self.network.ok(href.clone(), format!("content of {href}"));
        }
        self
    }

    /// Handles `request` and waits for its background writes.
    pub async fn fetch(&self, request: FetchRequest) -> Option<FetchResponse> {
        let response = self.engine.handle_fetch(&request).await;
        self.engine.settle().await;
        response
    }

    /// `GET url`, which must be routed by the engine.
    pub async fn get(&self, url: &str) -> FetchResponse {
        self.fetch(FetchRequest::get(url).unwrap())
            .await
            .expect("request must be handled by the engine")
    }

    /// Writes `entry` straight into the cache `name`.
    pub async fn seed(&self, name: &str, url: &str, entry: CacheEntry) {
        self.storage
            .inner()
            .put(name, EntryKey::get(url), entry)
            .await
            .unwrap();
    }

    /// Entry stored for `url` in the cache `name`.
    pub async fn stored(&self, name: &str, url: &str) -> Option<CacheEntry> {
        self.storage
            .inner()
            .lookup(name, &EntryKey::get(url))
            .await
            .unwrap()
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
