//! Engine configuration.
//!
//! [`EngineConfig`] is built once, validated, and shared by `Arc` between every
//! component. Relative URLs (precache manifest, shell document) are resolved
//! against the configured origin at build time, so lookups compare full URLs.

use http::Uri;
use offbox_core::{EntryKey, GenerationNames};
use smol_str::SmolStr;

use crate::classifier::RuleSet;
use crate::error::EngineError;
use crate::notification::NotificationConfig;
use crate::offload::OffloadConfig;
use crate::policy::FreshnessPolicy;

/// Default cache name prefix.
pub const DEFAULT_PREFIX: &str = "interbox";
/// Default version tag.
pub const DEFAULT_VERSION: &str = "v1.3.0";
/// Default shell document served to offline navigations.
pub const DEFAULT_SHELL: &str = "/index.html";
/// Default background sync tag.
pub const DEFAULT_SYNC_TAG: &str = "background-sync";

/// Default precache manifest.
pub const DEFAULT_PRECACHE: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/favicon.ico",
    "/apple-touch-icon.png",
    "/favicon-16x16.png",
    "/favicon-32x32.png",
    "/favicon-192x192.png",
    "/favicon-512x512.png",
    "/logos/logo_circulo.png",
    "/images/bg_main.png",
    "/images/bg_rounded.png",
    "/images/twolines.png",
    "/images/pngtree-light-gray-old-paper.png",
    "/logos/oficial_logo.png",
    "/logos/nome_hrz.png",
    "/offline.html",
];

/// Validated engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    origin: Uri,
    generations: GenerationNames,
    precache: Vec<Uri>,
    shell: Uri,
    rules: RuleSet,
    freshness: FreshnessPolicy,
    skip_waiting_on_install: bool,
    sync_tag: SmolStr,
    notifications: NotificationConfig,
    offload: OffloadConfig,
}

impl EngineConfig {
    /// Starts a builder for an application served from `origin`.
    pub fn builder(origin: Uri) -> EngineConfigBuilder {
        EngineConfigBuilder::new(origin)
    }

    /// Application origin.
    pub fn origin(&self) -> &Uri {
        &self.origin
    }

    /// Current generation names.
    pub fn generations(&self) -> &GenerationNames {
        &self.generations
    }

    /// Resolved precache manifest.
    pub fn precache(&self) -> &[Uri] {
        &self.precache
    }

    /// Resolved shell document URL.
    pub fn shell(&self) -> &Uri {
        &self.shell
    }

    /// Cache key of the shell document.
    pub fn shell_key(&self) -> EntryKey {
        EntryKey::get(self.shell.to_string())
    }

    /// Routing rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Freshness and cleanup policy.
    pub fn freshness(&self) -> &FreshnessPolicy {
        &self.freshness
    }

    /// Whether install asks the host to skip waiting.
    pub fn skip_waiting_on_install(&self) -> bool {
        self.skip_waiting_on_install
    }

    /// Tag that triggers background sync.
    pub fn sync_tag(&self) -> &str {
        &self.sync_tag
    }

    /// Push notification rendering.
    pub fn notifications(&self) -> &NotificationConfig {
        &self.notifications
    }

    /// Write-behind task configuration.
    pub fn offload(&self) -> &OffloadConfig {
        &self.offload
    }

    /// Resolves `url` against the origin.
    ///
    /// Absolute URLs are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUrl`] when the result is not a valid URI.
    pub fn resolve(&self, url: &str) -> Result<Uri, EngineError> {
        resolve(&self.origin, url)
    }
}

fn resolve(origin: &Uri, url: &str) -> Result<Uri, EngineError> {
    let invalid = |source: http::Error| EngineError::InvalidUrl {
        url: url.to_owned(),
        source,
    };

    let parsed: Uri = url.parse().map_err(|error: http::uri::InvalidUri| invalid(error.into()))?;
    if parsed.scheme().is_some() {
        return Ok(parsed);
    }

    let (Some(scheme), Some(authority)) = (origin.scheme_str(), origin.authority()) else {
        return Err(EngineError::InvalidOrigin(origin.to_string()));
    };
    let path = if url.starts_with('/') {
        url.to_owned()
    } else {
        format!("/{url}")
    };
    Uri::builder()
        .scheme(scheme)
        .authority(authority.as_str())
        .path_and_query(path)
        .build()
        .map_err(invalid)
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    origin: Uri,
    prefix: SmolStr,
    version: SmolStr,
    precache: Vec<String>,
    shell: String,
    rules: RuleSet,
    freshness: FreshnessPolicy,
    skip_waiting_on_install: bool,
    sync_tag: SmolStr,
    notifications: NotificationConfig,
    offload: OffloadConfig,
}

impl EngineConfigBuilder {
    fn new(origin: Uri) -> Self {
        Self {
            origin,
            prefix: SmolStr::new_static(DEFAULT_PREFIX),
            version: SmolStr::new_static(DEFAULT_VERSION),
            precache: DEFAULT_PRECACHE.iter().map(|url| (*url).to_owned()).collect(),
            shell: DEFAULT_SHELL.to_owned(),
            rules: RuleSet::standard(),
            freshness: FreshnessPolicy::default(),
            skip_waiting_on_install: true,
            sync_tag: SmolStr::new_static(DEFAULT_SYNC_TAG),
            notifications: NotificationConfig::default(),
            offload: OffloadConfig::default(),
        }
    }

    /// Cache name prefix.
    pub fn prefix(mut self, prefix: impl Into<SmolStr>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Version tag embedded in every generation name.
    pub fn version(mut self, version: impl Into<SmolStr>) -> Self {
        self.version = version.into();
        self
    }

    /// Replaces the precache manifest.
    pub fn precache<I, U>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.precache = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Shell document served to offline navigations.
    pub fn shell(mut self, url: impl Into<String>) -> Self {
        self.shell = url.into();
        self
    }

    /// Routing rules.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Freshness and cleanup policy.
    pub fn freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }

    /// Whether install asks the host to skip waiting.
    pub fn skip_waiting_on_install(mut self, enabled: bool) -> Self {
        self.skip_waiting_on_install = enabled;
        self
    }

    /// Tag that triggers background sync.
    pub fn sync_tag(mut self, tag: impl Into<SmolStr>) -> Self {
        self.sync_tag = tag.into();
        self
    }

    /// Push notification rendering.
    pub fn notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Write-behind task configuration.
    pub fn offload(mut self, offload: OffloadConfig) -> Self {
        self.offload = offload;
        self
    }

    /// Validates and resolves the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the origin is not absolute or a configured URL is invalid.
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        if self.origin.scheme().is_none() || self.origin.authority().is_none() {
            return Err(EngineError::InvalidOrigin(self.origin.to_string()));
        }
        if !self.freshness.is_consistent() {
            tracing::warn!(
                cleanup_age = ?self.freshness.cleanup_age,
                "cleanup age does not exceed every max-age; fresh entries may be swept"
            );
        }

        let precache = self
            .precache
            .iter()
            .map(|url| resolve(&self.origin, url))
            .collect::<Result<Vec<_>, _>>()?;
        let shell = resolve(&self.origin, &self.shell)?;

        Ok(EngineConfig {
            generations: GenerationNames::new(&self.prefix, &self.version),
            origin: self.origin,
            precache,
            shell,
            rules: self.rules,
            freshness: self.freshness,
            skip_waiting_on_install: self.skip_waiting_on_install,
            sync_tag: self.sync_tag,
            notifications: self.notifications,
            offload: self.offload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offbox_core::GenerationRole;

    fn origin() -> Uri {
        Uri::from_static("https://app.example")
    }

    #[test]
    fn defaults_resolve_against_origin() {
        let config = EngineConfig::builder(origin()).build().unwrap();

        assert_eq!(config.precache().len(), DEFAULT_PRECACHE.len());
        assert_eq!(config.precache()[0].to_string(), "https://app.example/");
        assert_eq!(config.shell().to_string(), "https://app.example/index.html");
        assert_eq!(
            config.shell_key(),
            EntryKey::get("https://app.example/index.html")
        );
        assert_eq!(
            config.generations().name(GenerationRole::Static),
            "interbox-static-v1.3.0"
        );
        assert_eq!(config.sync_tag(), "background-sync");
        assert!(config.skip_waiting_on_install());
    }

    #[test]
    fn absolute_and_bare_paths() {
        let config = EngineConfig::builder(origin()).build().unwrap();
        assert_eq!(
            config.resolve("https://cdn.example/x.css").unwrap().to_string(),
            "https://cdn.example/x.css"
        );
        assert_eq!(
            config.resolve("offline.html").unwrap().to_string(),
            "https://app.example/offline.html"
        );
    }

    #[test]
    fn relative_origin_is_rejected() {
        let result = EngineConfig::builder(Uri::from_static("/app")).build();
        assert!(matches!(result, Err(EngineError::InvalidOrigin(_))));
    }

    #[test]
    fn invalid_precache_url_is_rejected() {
        let result = EngineConfig::builder(origin())
            .precache(["/ok.png", "/bad path"])
            .build();
        assert!(matches!(result, Err(EngineError::InvalidUrl { .. })));
    }
}
