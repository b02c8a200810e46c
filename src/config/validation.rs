//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check namespace uniqueness and shape
//! - Validate backend URLs and listener addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("service '{service}' has invalid namespace '{namespace}'")]
    InvalidNamespace { service: String, namespace: String },

    #[error("namespace '{0}' is registered more than once")]
    DuplicateNamespace(String),

    #[error("service '{service}' has invalid url: {reason}")]
    InvalidServiceUrl { service: String, reason: String },

    #[error("public route '{0}' must start with '/'")]
    InvalidPublicRoute(String),

    #[error("docs.upstream is invalid: {0}")]
    InvalidDocsUpstream(String),

    #[error("docs.manifest_path '{0}' must start with '/'")]
    InvalidManifestPath(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        let ns = &service.namespace;
        if ns.is_empty() || ns.contains('/') || ns == "swagger" {
            errors.push(ValidationError::InvalidNamespace {
                service: service.name.clone(),
                namespace: ns.clone(),
            });
        } else if !seen.insert(ns.as_str()) {
            errors.push(ValidationError::DuplicateNamespace(ns.clone()));
        }

        if let Err(reason) = check_http_url(&service.url) {
            errors.push(ValidationError::InvalidServiceUrl {
                service: service.name.clone(),
                reason,
            });
        }
    }

    for route in &config.auth.public_routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidPublicRoute(route.path.clone()));
        }
    }

    if let Some(upstream) = &config.docs.upstream {
        if let Err(reason) = check_http_url(upstream) {
            errors.push(ValidationError::InvalidDocsUpstream(reason));
        }
    }

    if !config.docs.manifest_path.starts_with('/') {
        errors.push(ValidationError::InvalidManifestPath(
            config.docs.manifest_path.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Backends are reached over plain HTTP only.
fn check_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}
