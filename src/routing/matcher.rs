//! Public route matching logic.
//!
//! # Responsibilities
//! - Compile configured public routes into match rules
//! - Match documentation paths ahead of the configured list
//! - Decide whether a request path needs a credential
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - First match wins; a match only ever grants access
//! - Prefix rules are plain string prefixes ("/auth/login" covers "/auth/loginXYZ")
//! - No regex to guarantee O(n) matching

use crate::config::{MatchKind, PublicRouteConfig};

/// Prefix under which documentation is always public.
pub const DOCS_SEGMENT: &str = "swagger";

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// A compiled public route rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRule {
    /// Path equals the rule literally.
    Exact(String),
    /// Path starts with the rule string.
    Prefix(String),
    /// Rule was declared as "<prefix>/*"; path starts with "<prefix>".
    WildcardSuffix(String),
}

impl RouteRule {
    /// Compile a configured public route.
    pub fn from_config(config: &PublicRouteConfig) -> Self {
        let path = config.path.as_str();
        let kind = config.kind.unwrap_or(if path.ends_with("/*") {
            MatchKind::WildcardSuffix
        } else {
            MatchKind::Prefix
        });

        match kind {
            MatchKind::Exact => RouteRule::Exact(path.to_string()),
            MatchKind::Prefix => RouteRule::Prefix(path.to_string()),
            MatchKind::WildcardSuffix => {
                let prefix = path.strip_suffix("/*").unwrap_or(path);
                RouteRule::WildcardSuffix(prefix.to_string())
            }
        }
    }

    fn pattern(&self) -> &str {
        match self {
            RouteRule::Exact(p) | RouteRule::Prefix(p) | RouteRule::WildcardSuffix(p) => p,
        }
    }
}

impl Matcher for RouteRule {
    fn matches(&self, path: &str) -> bool {
        match self {
            RouteRule::Exact(rule) => path == rule.as_str(),
            RouteRule::Prefix(prefix) | RouteRule::WildcardSuffix(prefix) => {
                path.starts_with(prefix.as_str())
            }
        }
    }
}

/// Matches documentation paths: "/swagger/..." and "/<namespace>/swagger/...".
#[derive(Debug, Clone)]
pub struct DocsMatcher {
    prefixes: Vec<String>,
}

impl DocsMatcher {
    /// Create a docs matcher covering the gateway root and each namespace.
    pub fn new<'a>(namespaces: impl IntoIterator<Item = &'a str>) -> Self {
        let mut prefixes = vec![format!("/{}/", DOCS_SEGMENT)];
        prefixes.extend(
            namespaces
                .into_iter()
                .map(|ns| format!("/{}/{}/", ns, DOCS_SEGMENT)),
        );
        Self { prefixes }
    }
}

impl Matcher for DocsMatcher {
    fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// The ordered set of public routes.
#[derive(Debug)]
pub struct PublicRoutes {
    docs: DocsMatcher,
    rules: Vec<RouteRule>,
}

impl PublicRoutes {
    pub fn new(docs: DocsMatcher, rules: Vec<RouteRule>) -> Self {
        Self { docs, rules }
    }

    /// Compile public routes from configuration.
    pub fn from_config<'a>(
        routes: &[PublicRouteConfig],
        namespaces: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(
            DocsMatcher::new(namespaces),
            routes.iter().map(RouteRule::from_config).collect(),
        )
    }

    /// Returns true if the path can be reached without a credential.
    pub fn is_public(&self, path: &str) -> bool {
        if self.docs.matches(path) {
            tracing::debug!(path = %path, "Documentation path is public");
            return true;
        }

        match self.rules.iter().find(|rule| rule.matches(path)) {
            Some(rule) => {
                tracing::debug!(path = %path, rule = %rule.pattern(), "Path matches public route");
                true
            }
            None => {
                tracing::debug!(path = %path, "Path is not public");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn defaults() -> PublicRoutes {
        let config = GatewayConfig::default();
        PublicRoutes::from_config(&config.auth.public_routes, ["auth", "users"])
    }

    #[test]
    fn test_rule_kind_inference() {
        assert_eq!(
            RouteRule::from_config(&PublicRouteConfig::new("/status/*")),
            RouteRule::WildcardSuffix("/status".into())
        );
        assert_eq!(
            RouteRule::from_config(&PublicRouteConfig::new("/auth/login")),
            RouteRule::Prefix("/auth/login".into())
        );
        assert_eq!(
            RouteRule::from_config(&PublicRouteConfig::with_kind("/health", MatchKind::Exact)),
            RouteRule::Exact("/health".into())
        );
    }

    #[test]
    fn test_exact_matcher() {
        let rule = RouteRule::Exact("/health".into());
        assert!(rule.matches("/health"));
        assert!(!rule.matches("/health/deep"));
        assert!(!rule.matches("/HEALTH"));
    }

    #[test]
    fn test_wildcard_matcher() {
        let rule = RouteRule::from_config(&PublicRouteConfig::new("/public/*"));
        assert!(rule.matches("/public/a/b"));
        assert!(rule.matches("/public"));
        assert!(!rule.matches("/private/a"));
    }

    #[test]
    fn test_prefix_matching_is_loose() {
        let routes = defaults();
        assert!(routes.is_public("/auth/register"));
        assert!(routes.is_public("/auth/registerXYZ"));
        assert!(routes.is_public("/auth/login"));
        assert!(routes.is_public("/health"));
        assert!(!routes.is_public("/auth/logout"));
        assert!(!routes.is_public("/users/42"));
        assert!(!routes.is_public("/Auth/login"));
    }

    #[test]
    fn test_docs_paths_are_public() {
        let routes = defaults();
        assert!(routes.is_public("/swagger/index.html"));
        assert!(routes.is_public("/auth/swagger/doc.json"));
        assert!(routes.is_public("/users/swagger/index.html"));
        assert!(!routes.is_public("/chats/swagger/index.html"));
        assert!(!routes.is_public("/users/swaggerx"));
        assert!(!routes.is_public("/users/swagger"));
        assert!(!routes.is_public("/swagger"));
    }

    #[test]
    fn test_empty_rule_list() {
        let routes = PublicRoutes::new(DocsMatcher::new(Vec::<&str>::new()), Vec::new());
        assert!(!routes.is_public("/health"));
        assert!(routes.is_public("/swagger/"));
        assert!(routes.rules.is_empty());
    }
}
