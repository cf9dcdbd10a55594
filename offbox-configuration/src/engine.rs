//! Root configuration document.

use http::Uri;
use offbox::{EngineConfig, FreshnessPolicy, NotificationConfig, RuleSet};
use offbox_core::StrategyName;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::offload::ConfigOffload;
use crate::rule::{ConfigMatcher, ConfigRule};
use crate::storage::{ConfigStorage, Moka};

fn default_true() -> bool {
    true
}

fn default_fallback() -> StrategyName {
    StrategyName::CacheFirst
}

/// Engine configuration as written in YAML.
///
/// Everything except `origin` is optional. Leaving `rules` out selects the
/// standard rule set; giving it replaces that set entirely.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigEngine {
    /// Origin the worker is registered on.
    pub origin: String,
    /// Generation name prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Release version embedded in generation names.
    #[serde(default)]
    pub version: Option<String>,
    /// Install-time URL list.
    #[serde(default)]
    pub precache: Option<Vec<String>>,
    /// Application shell served to offline navigations.
    #[serde(default)]
    pub shell: Option<String>,
    /// Request [`skip_waiting`](offbox::Host::skip_waiting) right after install.
    #[serde(default = "default_true")]
    pub skip_waiting_on_install: bool,
    /// Background sync tag handled by the engine.
    #[serde(default)]
    pub sync_tag: Option<String>,
    /// Per-generation max ages and the cleanup age.
    #[serde(default)]
    pub freshness: FreshnessPolicy,
    /// Ordered routing rules.
    #[serde(default)]
    pub rules: Option<Vec<ConfigRule>>,
    /// Requests left to the host. Only used with custom `rules`.
    #[serde(default)]
    pub passthrough: Option<Vec<ConfigMatcher>>,
    /// Strategy for requests no rule matched. Only used with custom `rules`.
    #[serde(default = "default_fallback")]
    pub fallback: StrategyName,
    /// Push notification content.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Background task settings.
    #[serde(default)]
    pub offload: ConfigOffload,
    /// Storage settings, in-memory moka by default.
    #[serde(default)]
    pub storage: Option<ConfigStorage>,
}

impl ConfigEngine {
    /// The configured storage, or the default moka storage.
    pub fn storage(&self) -> ConfigStorage {
        self.storage
            .clone()
            .unwrap_or_else(|| ConfigStorage::Moka(Moka::default()))
    }

    /// Compiles the routing section.
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let Some(rules) = &self.rules else {
            return Ok(RuleSet::standard());
        };
        let rules = rules
            .iter()
            .cloned()
            .map(ConfigRule::into_rule)
            .collect::<Result<Vec<_>, _>>()?;
        let passthrough = self
            .passthrough
            .iter()
            .flatten()
            .cloned()
            .map(ConfigMatcher::into_matcher)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet::new(passthrough, rules, self.fallback))
    }

    /// Builds the engine configuration.
    pub fn into_engine_config(self) -> Result<EngineConfig, ConfigError> {
        let origin = self
            .origin
            .parse::<Uri>()
            .map_err(|_| ConfigError::InvalidOrigin(self.origin.clone()))?;
        let rules = self.rule_set()?;

        let mut builder = EngineConfig::builder(origin)
            .rules(rules)
            .freshness(self.freshness)
            .skip_waiting_on_install(self.skip_waiting_on_install)
            .notifications(self.notifications)
            .offload(self.offload.into_offload_config());
        if let Some(prefix) = self.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        if let Some(precache) = self.precache {
            builder = builder.precache(precache);
        }
        if let Some(shell) = self.shell {
            builder = builder.shell(shell);
        }
        if let Some(tag) = self.sync_tag {
            builder = builder.sync_tag(tag);
        }
        Ok(builder.build()?)
    }
}
