//! Routing rules.

use http::Method;
use offbox_core::{Destination, FetchRequest, GenerationRole, StrategyName};
use regex::Regex;
use smol_str::SmolStr;

/// A single test against a request.
///
/// The set of variants is closed on purpose: rules stay data, the classifier
/// stays a pure function, and every rule can be printed and compared.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regex tested against the full URL.
    UrlRegex(Regex),
    /// Substring of the URL path.
    PathContains(SmolStr),
    /// Request destination equals.
    Destination(Destination),
    /// Request method equals.
    Method(Method),
}

impl Matcher {
    /// Builds a [`Matcher::UrlRegex`].
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error.
    pub fn url(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Matcher::UrlRegex)
    }

    /// Builds a [`Matcher::PathContains`].
    pub fn path_contains(fragment: impl Into<SmolStr>) -> Self {
        Matcher::PathContains(fragment.into())
    }

    /// Tests the request. `href` is the request URL, computed once by the caller.
    pub fn matches(&self, request: &FetchRequest, href: &str) -> bool {
        match self {
            Matcher::UrlRegex(regex) => regex.is_match(href),
            Matcher::PathContains(fragment) => request.path().contains(fragment.as_str()),
            Matcher::Destination(destination) => request.destination() == *destination,
            Matcher::Method(method) => request.method() == method,
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::UrlRegex(a), Matcher::UrlRegex(b)) => a.as_str() == b.as_str(),
            (Matcher::PathContains(a), Matcher::PathContains(b)) => a == b,
            (Matcher::Destination(a), Matcher::Destination(b)) => a == b,
            (Matcher::Method(a), Matcher::Method(b)) => a == b,
            _ => false,
        }
    }
}

/// A named, ordered routing rule.
///
/// A rule matches when **any** of its matchers match.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    name: SmolStr,
    matchers: Vec<Matcher>,
    strategy: StrategyName,
    role: Option<GenerationRole>,
}

impl Rule {
    /// Creates a rule writing to the strategy's default generation.
    pub fn new(name: impl Into<SmolStr>, strategy: StrategyName, matchers: Vec<Matcher>) -> Self {
        Self {
            name: name.into(),
            matchers,
            strategy,
            role: None,
        }
    }

    /// Overrides the generation written by this rule.
    pub fn with_role(self, role: GenerationRole) -> Self {
        Self {
            role: Some(role),
            ..self
        }
    }

    /// Rule name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strategy selected by this rule.
    pub fn strategy(&self) -> StrategyName {
        self.strategy
    }

    /// Matchers of this rule.
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Generation written by this rule.
    pub fn role(&self) -> Option<GenerationRole> {
        self.role.or_else(|| self.strategy.default_role())
    }

    /// Tests the request against every matcher.
    pub fn matches(&self, request: &FetchRequest, href: &str) -> bool {
        self.matchers
            .iter()
            .any(|matcher| matcher.matches(request, href))
    }
}
