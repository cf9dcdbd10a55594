//! Request strategy names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generation::GenerationRole;

/// The read/write algorithm chosen for a request.
///
/// Serialized in kebab-case (`network-only`, `cache-first-versioned`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    /// Always go to the network, never touch the cache.
    NetworkOnly,
    /// Network, then cache on failure.
    NetworkFirst,
    /// Cache entries with a freshness window, refetched once expired.
    CacheFirstVersioned,
    /// Cache, then network on miss.
    CacheFirst,
    /// Network first, falling back to the cached app shell for navigations.
    NetworkFirstWithFallback,
}

impl StrategyName {
    /// All strategies.
    pub const ALL: [StrategyName; 5] = [
        StrategyName::NetworkOnly,
        StrategyName::NetworkFirst,
        StrategyName::CacheFirstVersioned,
        StrategyName::CacheFirst,
        StrategyName::NetworkFirstWithFallback,
    ];

    /// Wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::NetworkOnly => "network-only",
            StrategyName::NetworkFirst => "network-first",
            StrategyName::CacheFirstVersioned => "cache-first-versioned",
            StrategyName::CacheFirst => "cache-first",
            StrategyName::NetworkFirstWithFallback => "network-first-with-fallback",
        }
    }

    /// Generation written by this strategy unless a rule overrides it.
    ///
    /// `None` for [`StrategyName::NetworkOnly`], which never writes.
    pub fn default_role(&self) -> Option<GenerationRole> {
        match self {
            StrategyName::NetworkOnly => None,
            StrategyName::NetworkFirst => Some(GenerationRole::Runtime),
            StrategyName::CacheFirstVersioned => Some(GenerationRole::Static),
            StrategyName::CacheFirst | StrategyName::NetworkFirstWithFallback => {
                Some(GenerationRole::Dynamic)
            }
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyName {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyName::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for strategy in StrategyName::ALL {
            assert_eq!(strategy.as_str().parse::<StrategyName>(), Ok(strategy));
        }
        assert!("stale-while-revalidate".parse::<StrategyName>().is_err());
    }

    #[test]
    fn network_only_has_no_generation() {
        assert_eq!(StrategyName::NetworkOnly.default_role(), None);
        assert_eq!(
            StrategyName::CacheFirstVersioned.default_role(),
            Some(GenerationRole::Static)
        );
    }
}
