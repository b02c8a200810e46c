//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay backend responses to the client
//! - Rewrite the manifest reference embedded in documentation index pages
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the body
//! - Only documentation index pages are buffered, and only for one
//!   textual replacement
//! - Non UTF-8 bodies are relayed untouched

use axum::{
    body::{to_bytes, Body},
    http::header,
    response::Response,
};
use hyper::body::Incoming;

use crate::http::error::GatewayError;
use crate::routing::router::ManifestRewrite;

/// Upper bound on a buffered documentation page.
const MAX_DOCS_BODY: usize = 8 * 1024 * 1024;

/// Relay a backend response unmodified.
pub fn relay(response: hyper::Response<Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body))
}

/// Replace the first occurrence of the manifest reference in the body.
pub async fn rewrite_manifest(
    response: Response,
    rewrite: &ManifestRewrite,
    service: &str,
) -> Result<Response, GatewayError> {
    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_DOCS_BODY)
        .await
        .map_err(|e| GatewayError::upstream(service, e))?;

    let body = match String::from_utf8(bytes.to_vec()) {
        Ok(text) if text.contains(&rewrite.from) => {
            tracing::debug!(service = %service, to = %rewrite.to, "Rewriting manifest reference");
            Body::from(text.replacen(&rewrite.from, &rewrite.to, 1))
        }
        _ => Body::from(bytes),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    Ok(Response::from_parts(parts, body))
}
