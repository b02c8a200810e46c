//! Access gate.
//! Classifies paths as public or protected and verifies bearer credentials.

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, Request},
};

use crate::http::error::GatewayError;
use crate::http::pipeline::{Flow, Stage};
use crate::routing::matcher::PublicRoutes;
use crate::security::token::TokenVerifier;

/// Identity attached to requests carrying a verified credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: Option<String>,
}

impl VerifiedIdentity {
    /// The subject, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().filter(|s| !s.is_empty())
    }
}

/// Decides whether a request may proceed, and with which identity.
#[derive(Debug)]
pub struct AccessControl {
    public_routes: PublicRoutes,
    verifier: TokenVerifier,
}

impl AccessControl {
    pub fn new(public_routes: PublicRoutes, verifier: TokenVerifier) -> Self {
        Self {
            public_routes,
            verifier,
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.is_public(path)
    }

    /// Classify a request.
    ///
    /// `Ok(None)` for public paths, `Ok(Some(identity))` for a verified
    /// credential, `Err` for a rejection.
    pub fn classify(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Option<VerifiedIdentity>, GatewayError> {
        if self.is_public(path) {
            return Ok(None);
        }

        let header = headers
            .get(AUTHORIZATION)
            .ok_or(GatewayError::MissingCredential)?;
        let value = header
            .to_str()
            .map_err(|_| GatewayError::MalformedCredential)?;
        let token = bearer_token(value).ok_or(GatewayError::MalformedCredential)?;

        let claims = self
            .verifier
            .verify(token)
            .map_err(GatewayError::InvalidCredential)?;

        if claims.sub.is_none() {
            // Preserved behavior: a verified token without a subject proceeds anonymously.
            tracing::warn!(path = %path, "Verified token carries no string subject");
        }

        Ok(Some(VerifiedIdentity {
            subject: claims.sub,
        }))
    }
}

/// Extract the token from "Bearer <token>".
///
/// The value must split on single spaces into exactly two parts.
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

impl Stage for AccessControl {
    fn name(&self) -> &'static str {
        "access_control"
    }

    fn process(&self, request: &mut Request<Body>) -> Flow {
        let path = request.uri().path().to_string();
        match self.classify(&path, request.headers()) {
            Ok(Some(identity)) => {
                tracing::debug!(path = %path, subject = ?identity.subject, "Credential verified");
                request.extensions_mut().insert(identity);
                Flow::Continue
            }
            Ok(None) => Flow::Continue,
            Err(err) => Flow::reject(err),
        }
    }
}
