//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Prepare the incoming request for forwarding to a backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Method, query, end-to-end headers and body are forwarded as-is
//! - The body is streamed, never buffered

use axum::{
    body::Body,
    http::{request::Parts, HeaderName, HeaderValue, Request, Uri},
};
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::http::error::GatewayError;
use crate::security::access_control::VerifiedIdentity;
use crate::security::headers::prepare_forward_headers;

/// Request ID header name.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the request ID assigned to a request, if any.
pub fn request_id(parts: &Parts) -> &str {
    parts
        .headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the backend-bound request.
pub fn build_upstream_request(
    mut parts: Parts,
    body: Body,
    upstream_url: &str,
    identity: Option<&VerifiedIdentity>,
    forward_credentials: bool,
    service: &str,
) -> Result<Request<Body>, GatewayError> {
    let uri: Uri = upstream_url
        .parse()
        .map_err(|e| GatewayError::upstream(service, e))?;

    prepare_forward_headers(&mut parts.headers, identity, forward_credentials);

    let mut builder = Request::builder().method(parts.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = parts.headers;
    }

    builder
        .body(body)
        .map_err(|e| GatewayError::upstream(service, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::headers::USER_ID;
    use axum::http::Method;

    fn incoming() -> (Parts, Body) {
        Request::builder()
            .method(Method::POST)
            .uri("/users/42?x=1")
            .header("host", "gateway")
            .header("user-id", "spoofed")
            .header("content-type", "application/json")
            .header(&X_REQUEST_ID, "req-1")
            .body(Body::from("{}"))
            .unwrap()
            .into_parts()
    }

    #[test]
    fn test_upstream_request_preserves_method_and_headers() {
        let (parts, body) = incoming();
        assert_eq!(request_id(&parts), "req-1");

        let identity = VerifiedIdentity {
            subject: Some("u1".into()),
        };
        let req = build_upstream_request(
            parts,
            body,
            "http://127.0.0.1:7001/users/42?x=1",
            Some(&identity),
            false,
            "user-service",
        )
        .unwrap();

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri().to_string(), "http://127.0.0.1:7001/users/42?x=1");
        assert_eq!(req.headers().get(USER_ID).unwrap(), "u1");
        assert_eq!(req.headers().get("content-type").unwrap(), "application/json");
        assert_eq!(req.headers().get(&X_REQUEST_ID).unwrap(), "req-1");
        assert!(req.headers().get("host").is_none());
    }

    #[test]
    fn test_invalid_upstream_url() {
        let (parts, body) = incoming();
        let err = build_upstream_request(parts, body, "http://bad host/", None, false, "svc")
            .unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_uuid_request_ids_are_unique() {
        let request = Request::new(());
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
