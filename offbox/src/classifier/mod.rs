//! Strategy classification.
//!
//! [`Classifier::classify`] maps an intercepted request to a [`Route`] without
//! any I/O. Evaluation order:
//!
//! 1. non-`GET` requests pass through untouched
//! 2. pass-through markers (assets owned by another worker library)
//! 3. the ordered rules, first match wins
//! 4. the fallback strategy
//!
//! [`RuleSet::standard`] ships the default precedence: never-cache origins,
//! network-first API endpoints, static assets, documents.

mod rule;

pub use rule::{Matcher, Rule};

use offbox_core::{Destination, FetchRequest, GenerationRole, StrategyName};
use smol_str::SmolStr;
use tracing::debug;

/// Name reported for requests that matched no rule.
pub const FALLBACK_RULE: &str = "default";

/// Identity, auth and analytics origins that must never be cached.
const NEVER_CACHE: &[&str] = &[
    r"^https://(firebase|identitytoolkit|securetoken|accounts|apis)\.googleapis\.com",
    r"^https://firestore\.googleapis\.com",
    r"^https://storage\.googleapis\.com",
    r"^https://www\.google-analytics\.com",
    r"^https://analytics\.google\.com",
    r"^https://googletagmanager\.com",
    r"^https://www\.googletagmanager\.com",
];

/// Dynamic data endpoints.
const NETWORK_FIRST: &[&str] = &[
    r"^https://api\.",
    r"^https://functions\.",
    r"^https://us-central1-",
    r"^https://us-east1-",
];

const NETWORK_FIRST_PATHS: &[&str] = &["/api/", "/functions/"];

/// Static asset extensions and font origins.
const STATIC_ASSETS: &[&str] = &[
    r"\.(png|jpg|jpeg|gif|svg|ico|webp)$",
    r"\.(css|js)$",
    r"\.(woff|woff2|ttf|eot)$",
    r"^https://fonts\.googleapis\.com",
    r"^https://fonts\.gstatic\.com",
];

const STATIC_ASSET_PATHS: &[&str] = &["/assets/", "/logos/", "/images/"];

const PASSTHROUGH_PATHS: &[&str] = &["workbox-", "__WB_REVISION__"];

/// Outcome of classification for an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Selected strategy.
    pub strategy: StrategyName,
    /// Generation the strategy writes to. `None` for network-only.
    pub role: Option<GenerationRole>,
    /// Name of the rule that selected the strategy.
    pub rule: SmolStr,
}

/// Ordered routing rules plus pass-through markers and fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    passthrough: Vec<Matcher>,
    rules: Vec<Rule>,
    fallback: StrategyName,
}

impl RuleSet {
    /// Creates a rule set.
    pub fn new(passthrough: Vec<Matcher>, rules: Vec<Rule>, fallback: StrategyName) -> Self {
        Self {
            passthrough,
            rules,
            fallback,
        }
    }

    /// The default rule set.
    ///
    /// `api.` and `functions.` subdomains are network-first by convention;
    /// any other API origin needs an explicit rule.
    pub fn standard() -> Self {
        let urls = |patterns: &[&str]| -> Vec<Matcher> {
            patterns
                .iter()
                .map(|pattern| Matcher::url(pattern).expect("built-in pattern must compile"))
                .collect()
        };
        let paths = |fragments: &[&str]| -> Vec<Matcher> {
            fragments
                .iter()
                .map(|fragment| Matcher::path_contains(*fragment))
                .collect()
        };

        let mut network_first = urls(NETWORK_FIRST);
        network_first.extend(paths(NETWORK_FIRST_PATHS));

        let mut static_assets = urls(STATIC_ASSETS);
        static_assets.extend(paths(STATIC_ASSET_PATHS));
        static_assets.extend(
            [
                Destination::Image,
                Destination::Font,
                Destination::Style,
                Destination::Script,
            ]
            .into_iter()
            .map(Matcher::Destination),
        );

        Self::new(
            paths(PASSTHROUGH_PATHS),
            vec![
                Rule::new("never-cache", StrategyName::NetworkOnly, urls(NEVER_CACHE)),
                Rule::new("network-first", StrategyName::NetworkFirst, network_first),
                Rule::new(
                    "static-assets",
                    StrategyName::CacheFirstVersioned,
                    static_assets,
                ),
                Rule::new(
                    "documents",
                    StrategyName::NetworkFirstWithFallback,
                    vec![Matcher::Destination(Destination::Document)],
                ),
            ],
            StrategyName::CacheFirst,
        )
    }

    /// Pass-through markers.
    pub fn passthrough(&self) -> &[Matcher] {
        &self.passthrough
    }

    /// Ordered rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Strategy used when no rule matches.
    pub fn fallback(&self) -> StrategyName {
        self.fallback
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pure request classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    /// Creates a classifier over `rules`.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Selects a route for `request`, or `None` when the request must pass
    /// through to the network untouched.
    pub fn classify(&self, request: &FetchRequest) -> Option<Route> {
        if !request.is_safe_read() {
            debug!(method = %request.method(), "passing through non-GET request");
            return None;
        }

        let href = request.href();
        if self
            .rules
            .passthrough
            .iter()
            .any(|matcher| matcher.matches(request, &href))
        {
            debug!(url = %href, "passing through foreign worker asset");
            return None;
        }

        let route = match self
            .rules
            .rules
            .iter()
            .find(|rule| rule.matches(request, &href))
        {
            Some(rule) => Route {
                strategy: rule.strategy(),
                role: rule.role(),
                rule: SmolStr::new(rule.name()),
            },
            None => Route {
                strategy: self.rules.fallback,
                role: self.rules.fallback.default_role(),
                rule: SmolStr::new_static(FALLBACK_RULE),
            },
        };
        debug!(url = %href, strategy = %route.strategy, rule = %route.rule, "classified request");
        Some(route)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn strategy_of(request: FetchRequest) -> Option<StrategyName> {
        Classifier::default()
            .classify(&request)
            .map(|route| route.strategy)
    }

    fn get(url: &str) -> FetchRequest {
        FetchRequest::get(url).unwrap()
    }

    #[test]
    fn non_get_requests_pass_through() {
        let request = FetchRequest::new(
            Method::POST,
            "https://app.example/api/save".parse().unwrap(),
        );
        assert_eq!(strategy_of(request), None);
    }

    #[test]
    fn workbox_assets_pass_through() {
        assert_eq!(strategy_of(get("https://app.example/workbox-abc123.js")), None);
    }

    #[test]
    fn precedence_table() {
        let cases = [
            (
                get("https://identitytoolkit.googleapis.com/v1/accounts:lookup"),
                StrategyName::NetworkOnly,
            ),
            (
                get("https://firestore.googleapis.com/v1/projects/x/logo.png"),
                StrategyName::NetworkOnly,
            ),
            (
                get("https://us-central1-x.cloudfunctions.net/api"),
                StrategyName::NetworkFirst,
            ),
            (get("https://api.example.com/users"), StrategyName::NetworkFirst),
            (
                get("https://app.example/api/teams.png"),
                StrategyName::NetworkFirst,
            ),
            (
                get("https://fonts.gstatic.com/foo.woff2"),
                StrategyName::CacheFirstVersioned,
            ),
            (
                get("https://app.example/logos/brand"),
                StrategyName::CacheFirstVersioned,
            ),
            (
                get("https://cdn.example/avatar").with_destination(Destination::Image),
                StrategyName::CacheFirstVersioned,
            ),
            (
                FetchRequest::navigation("https://app.example/hub").unwrap(),
                StrategyName::NetworkFirstWithFallback,
            ),
            (get("https://app.example/manifest.json"), StrategyName::CacheFirst),
        ];

        for (request, expected) in cases {
            let url = request.href();
            assert_eq!(strategy_of(request), Some(expected), "{url}");
        }
    }

    #[test]
    fn routes_carry_generation_roles() {
        let classifier = Classifier::default();
        let route = classifier
            .classify(&get("https://fonts.gstatic.com/foo.woff2"))
            .unwrap();
        assert_eq!(route.role, Some(GenerationRole::Static));
        assert_eq!(route.rule, "static-assets");

        let route = classifier
            .classify(&get("https://accounts.googleapis.com/token"))
            .unwrap();
        assert_eq!(route.role, None);

        let route = classifier
            .classify(&get("https://app.example/data.txt"))
            .unwrap();
        assert_eq!(route.role, Some(GenerationRole::Dynamic));
        assert_eq!(route.rule, FALLBACK_RULE);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = Classifier::default();
        let request = get("https://app.example/styles/main.css");
        assert_eq!(classifier.classify(&request), classifier.classify(&request));
    }

    #[test]
    fn rule_role_override_wins() {
        let rules = RuleSet::new(
            vec![],
            vec![
                Rule::new(
                    "api",
                    StrategyName::NetworkFirst,
                    vec![Matcher::path_contains("/v2/")],
                )
                .with_role(GenerationRole::Dynamic),
            ],
            StrategyName::CacheFirst,
        );
        let route = Classifier::new(rules)
            .classify(&get("https://app.example/v2/items"))
            .unwrap();
        assert_eq!(route.strategy, StrategyName::NetworkFirst);
        assert_eq!(route.role, Some(GenerationRole::Dynamic));
    }
}
