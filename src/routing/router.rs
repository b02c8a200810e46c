//! Namespace lookup and dispatch.
//!
//! # Responsibilities
//! - Store backend targets keyed by namespace
//! - Resolve a request path to a destination (service, service docs, gateway docs)
//! - Build the upstream URL for a destination
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) namespace lookup via HashMap on the first path segment
//! - Namespaces are single segments, so registrations never overlap
//! - Explicit None rather than silent default

use std::collections::HashMap;

use url::Url;

use crate::config::{DocsConfig, ServiceConfig, ValidationError};
use crate::routing::matcher::DOCS_SEGMENT;

/// Documentation entry-point resources that get the manifest rewrite.
const DOCS_INDEX: &str = "index.html";

/// A backend service owning one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub name: String,
    pub namespace: String,
    pub base_url: Url,
}

impl ServiceTarget {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ValidationError> {
        let base_url =
            Url::parse(&config.url).map_err(|e| ValidationError::InvalidServiceUrl {
                service: config.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name: config.name.clone(),
            namespace: config.namespace.clone(),
            base_url,
        })
    }
}

/// Where a request is forwarded.
#[derive(Debug, Clone)]
pub enum Destination<'a> {
    /// Regular API traffic: "/<ns>/<remainder>".
    Service {
        target: &'a ServiceTarget,
        remainder: &'a str,
    },
    /// A service's documentation: "/<ns>/swagger/<resource>".
    ServiceDocs {
        target: &'a ServiceTarget,
        resource: &'a str,
    },
    /// The gateway's own documentation: "/swagger/<resource>".
    GatewayDocs { base_url: &'a Url, resource: &'a str },
}

/// A textual replacement applied once to a documentation index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRewrite {
    pub from: String,
    pub to: String,
}

impl<'a> Destination<'a> {
    /// Service name for logs and metrics.
    pub fn service_name(&self) -> &str {
        match self {
            Destination::Service { target, .. } | Destination::ServiceDocs { target, .. } => {
                &target.name
            }
            Destination::GatewayDocs { .. } => "gateway-docs",
        }
    }

    /// Whether the verified identity is attached when forwarding.
    pub fn carries_identity(&self) -> bool {
        matches!(self, Destination::Service { .. })
    }

    /// Build the absolute upstream URL, keeping the original query string.
    pub fn upstream_url(&self, query: Option<&str>) -> String {
        let mut url = match self {
            Destination::Service { target, remainder } => format!(
                "{}/{}/{}",
                trim_base(&target.base_url),
                target.namespace,
                remainder
            ),
            Destination::ServiceDocs { target, resource } => {
                let resource = if is_docs_index(resource) { DOCS_INDEX } else { *resource };
                format!("{}/{}/{}", trim_base(&target.base_url), DOCS_SEGMENT, resource)
            }
            Destination::GatewayDocs { base_url, resource } => {
                format!("{}/{}/{}", trim_base(base_url), DOCS_SEGMENT, resource)
            }
        };

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// The manifest rewrite to apply to the response, if any.
    ///
    /// Only a service's documentation index page embeds a root-relative
    /// manifest reference that must be moved under the namespace.
    pub fn manifest_rewrite(&self, manifest_path: &str) -> Option<ManifestRewrite> {
        match self {
            Destination::ServiceDocs { target, resource } if is_docs_index(resource) => {
                Some(ManifestRewrite {
                    from: format!(r#""url":"{}""#, manifest_path),
                    to: format!(r#""url":"/{}{}""#, target.namespace, manifest_path),
                })
            }
            _ => None,
        }
    }
}

fn trim_base(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}

fn is_docs_index(resource: &str) -> bool {
    matches!(resource, "" | "/" | DOCS_INDEX)
}

/// Maps request paths to backend targets.
#[derive(Debug, Default)]
pub struct ServiceRouter {
    targets: HashMap<String, ServiceTarget>,
    docs_upstream: Option<Url>,
}

impl ServiceRouter {
    /// Build the router from configuration.
    pub fn from_config(
        services: &[ServiceConfig],
        docs: &DocsConfig,
    ) -> Result<Self, ValidationError> {
        let mut targets = HashMap::with_capacity(services.len());
        for service in services {
            let target = ServiceTarget::from_config(service)?;
            tracing::debug!(
                service = %target.name,
                namespace = %target.namespace,
                base_url = %target.base_url,
                "Registered service"
            );
            if targets.insert(target.namespace.clone(), target).is_some() {
                return Err(ValidationError::DuplicateNamespace(service.namespace.clone()));
            }
        }

        let docs_upstream = docs
            .upstream
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| ValidationError::InvalidDocsUpstream(e.to_string()))?;

        Ok(Self {
            targets,
            docs_upstream,
        })
    }

    /// Resolve a request path to its destination.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<Destination<'a>> {
        let trimmed = path.strip_prefix('/')?;
        let (segment, rest) = match trimmed.split_once('/') {
            Some((DOCS_SEGMENT, resource)) => {
                return self
                    .docs_upstream
                    .as_ref()
                    .map(|base_url| Destination::GatewayDocs { base_url, resource });
            }
            Some((segment, rest)) => (segment, rest),
            None => (trimmed, ""),
        };

        let target = self.targets.get(segment)?;

        if let Some(resource) = docs_resource(rest) {
            return Some(Destination::ServiceDocs { target, resource });
        }

        Some(Destination::Service {
            target,
            remainder: rest,
        })
    }

    /// Registered namespaces.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}

/// Docs live under "<ns>/swagger/"; a bare "<ns>/swagger" is API traffic.
fn docs_resource(rest: &str) -> Option<&str> {
    rest.strip_prefix(DOCS_SEGMENT)?.strip_prefix('/')
}
