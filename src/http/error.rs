//! Gateway error taxonomy and its HTTP mapping.
//!
//! Every variant terminates the request. The client sees a JSON body
//! `{"error": "<message>"}`; sources are only logged.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::observability::metrics;
use crate::security::token::TokenError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing authorization header")]
    MissingCredential,

    #[error("Invalid authorization header format")]
    MalformedCredential,

    #[error("Invalid or expired token")]
    InvalidCredential(#[source] TokenError),

    #[error("Cannot {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("Upstream service unavailable")]
    UpstreamUnavailable {
        service: String,
        #[source]
        source: BoxError,
    },
}

impl GatewayError {
    pub fn upstream(service: impl Into<String>, source: impl Into<BoxError>) -> Self {
        GatewayError::UpstreamUnavailable {
            service: service.into(),
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MissingCredential
            | GatewayError::MalformedCredential
            | GatewayError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics.
    fn reason(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential => "missing_credential",
            GatewayError::MalformedCredential => "malformed_credential",
            GatewayError::InvalidCredential(_) => "invalid_credential",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::UpstreamUnavailable { .. } => "upstream_unavailable",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            GatewayError::InvalidCredential(source) => {
                tracing::warn!(error = %source, "Token verification failed");
            }
            GatewayError::UpstreamUnavailable { service, source } => {
                tracing::error!(service = %service, error = %source, "Upstream error");
            }
            other => {
                tracing::debug!(status = %status, error = %other, "Request rejected");
            }
        }

        if status == StatusCode::UNAUTHORIZED {
            metrics::record_auth_rejection(self.reason());
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
