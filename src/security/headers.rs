//! Header manipulation for forwarded requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers
//! - Replace any client-supplied `User-Id` with the verified subject
//! - Drop the raw credential unless forwarding is enabled
//!
//! # Design Decisions
//! - The verified identity is authoritative; client `User-Id` never passes
//! - `Host` is derived from the upstream URI, not copied

use axum::http::{
    header::{self, HeaderName, HeaderValue},
    HeaderMap,
};

use crate::security::access_control::VerifiedIdentity;

/// Header carrying the verified subject to backends.
pub const USER_ID: HeaderName = HeaderName::from_static("user-id");

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Prepare end-to-end headers for the upstream request.
pub fn prepare_forward_headers(
    headers: &mut HeaderMap,
    identity: Option<&VerifiedIdentity>,
    forward_credentials: bool,
) {
    strip_hop_by_hop(headers);
    headers.remove(header::HOST);

    if !forward_credentials {
        headers.remove(header::AUTHORIZATION);
    }

    headers.remove(USER_ID);
    if let Some(subject) = identity.and_then(VerifiedIdentity::subject) {
        match HeaderValue::from_str(subject) {
            Ok(value) => {
                headers.insert(USER_ID, value);
            }
            Err(_) => {
                tracing::warn!(subject = %subject, "Subject is not a valid header value; not forwarded");
            }
        }
    }
}
