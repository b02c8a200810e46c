//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Credential verification and public routes.
    pub auth: AuthConfig,

    /// Backend services, one per namespace.
    pub services: Vec<ServiceConfig>,

    /// Documentation proxy settings.
    pub docs: DocsConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[cfg(test)]
impl GatewayConfig {
    pub(crate) fn service(&self, namespace: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.namespace == namespace)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify bearer tokens.
    pub jwt_secret: String,

    /// Ordered list of routes reachable without a credential.
    pub public_routes: Vec<PublicRouteConfig>,

    /// Forward the client's `Authorization` header to backends.
    pub forward_credentials: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            public_routes: default_public_routes(),
            forward_credentials: false,
        }
    }
}

fn default_public_routes() -> Vec<PublicRouteConfig> {
    [
        "/health",
        "/auth/register",
        "/auth/verify-registration",
        "/auth/login",
        "/auth/password-reset",
        "/auth/verify-reset-code",
        "/auth/reset-password",
    ]
    .into_iter()
    .map(PublicRouteConfig::new)
    .collect()
}

/// How a public route path is compared against request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Prefix,
    WildcardSuffix,
}

/// A route declared public in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublicRouteConfig {
    /// Path pattern, e.g. "/auth/login" or "/status/*".
    pub path: String,

    /// Match kind; inferred from the path when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MatchKind>,
}

impl PublicRouteConfig {
    /// Public route with an inferred match kind.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    /// Public route with an explicit match kind.
    pub fn with_kind(path: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            path: path.into(),
            kind: Some(kind),
        }
    }
}

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier for logging/metrics.
    pub name: String,

    /// Path namespace owned by this service (single segment, e.g. "users").
    pub namespace: String,

    /// Base URL (e.g., "http://user-service:8080").
    pub url: String,
}

impl ServiceConfig {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            url: url.into(),
        }
    }
}

/// Documentation proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Backend serving the gateway's own `/swagger/*` documentation.
    pub upstream: Option<String>,

    /// Manifest path referenced by a service's documentation index page.
    pub manifest_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            manifest_path: "/swagger/doc.json".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; "*" allows any.
    pub allow_origins: Vec<String>,

    /// Allowed request methods.
    pub allow_methods: Vec<String>,

    /// Allowed request headers.
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_headers: ["Origin", "Content-Type", "Accept", "Authorization"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
