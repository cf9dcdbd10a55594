//! Routing rule configuration.
//!
//! ```yaml
//! rules:
//!   - name: never-cache
//!     strategy: network-only
//!     match:
//!       - Url: "^https://identitytoolkit\\.googleapis\\.com"
//!   - name: static-assets
//!     strategy: cache-first-versioned
//!     match:
//!       - Url: "\\.(png|svg|woff2)$"
//!       - PathContains: /assets/
//!       - Destination: image
//!   - name: reports
//!     strategy: network-first
//!     role: dynamic
//!     match:
//!       - PathContains: /reports/
//! ```

use http::Method;
use offbox::{Matcher, Rule};
use offbox_core::{Destination, GenerationRole, StrategyName};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One matcher, written as a single-key map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ConfigMatcher {
    /// Regex tested against the full URL.
    Url(String),
    /// Substring of the URL path.
    PathContains(String),
    /// Request destination.
    Destination(Destination),
    /// Request method.
    Method(String),
}

impl ConfigMatcher {
    /// Compiles into an engine [`Matcher`].
    pub fn into_matcher(self) -> Result<Matcher, ConfigError> {
        match self {
            ConfigMatcher::Url(pattern) => Matcher::url(&pattern)
                .map_err(|source| ConfigError::InvalidRegex { pattern, source }),
            ConfigMatcher::PathContains(fragment) => Ok(Matcher::path_contains(fragment)),
            ConfigMatcher::Destination(destination) => Ok(Matcher::Destination(destination)),
            ConfigMatcher::Method(method) => Method::from_bytes(method.as_bytes())
                .map(Matcher::Method)
                .map_err(|_| ConfigError::InvalidMethod(method)),
        }
    }
}

/// A named routing rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigRule {
    /// Rule name, reported in logs.
    pub name: String,
    /// Strategy applied when the rule matches.
    pub strategy: StrategyName,
    /// Generation written, defaults to the strategy's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<GenerationRole>,
    /// Matchers; the rule applies when any matches.
    #[serde(rename = "match")]
    pub matchers: Vec<ConfigMatcher>,
}

impl ConfigRule {
    /// Compiles into an engine [`Rule`].
    pub fn into_rule(self) -> Result<Rule, ConfigError> {
        if self.matchers.is_empty() {
            return Err(ConfigError::EmptyMatcherList(self.name));
        }
        let matchers = self
            .matchers
            .into_iter()
            .map(ConfigMatcher::into_matcher)
            .collect::<Result<Vec<_>, _>>()?;
        let rule = Rule::new(self.name, self.strategy, matchers);
        Ok(match self.role {
            Some(role) => rule.with_role(role),
            None => rule,
        })
    }
}
