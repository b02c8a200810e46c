//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health endpoint and the dispatch fallback
//! - Wire up middleware (CORS, request ID, tracing, request pipeline)
//! - Bind server to listener
//! - Dispatch requests to the namespace owner
//! - Forward requests to upstream backends and relay responses

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, CorsConfig, GatewayConfig};
use crate::http::error::GatewayError;
use crate::http::pipeline::{pipeline_middleware, Pipeline};
use crate::http::request::{build_upstream_request, request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::{relay, rewrite_manifest};
use crate::observability::metrics;
use crate::routing::matcher::PublicRoutes;
use crate::routing::router::ServiceRouter;
use crate::security::access_control::{AccessControl, VerifiedIdentity};
use crate::security::token::TokenVerifier;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ServiceRouter>,
    pub client: Client<HttpConnector, Body>,
    pub forward_credentials: bool,
    pub manifest_path: Arc<str>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server from a configuration.
    ///
    /// The configuration is validated again here so programmatic configs
    /// get the same checks as loaded ones.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let service_router = ServiceRouter::from_config(&config.services, &config.docs)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        let access = AccessControl::new(
            PublicRoutes::from_config(&config.auth.public_routes, service_router.namespaces()),
            TokenVerifier::new(&config.auth.jwt_secret),
        );
        let pipeline = Pipeline::new().with_stage(Arc::new(access));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            router: Arc::new(service_router),
            client,
            forward_credentials: config.auth.forward_credentials,
            manifest_path: Arc::from(config.docs.manifest_path.as_str()),
        };

        let router = Self::build_router(&config, state, pipeline);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState, pipeline: Pipeline) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(pipeline, pipeline_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    // preflight is answered here, ahead of the access gate
                    .layer(cors_layer(&config.cors)),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.config.services.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods: Vec<Method> = config
        .allow_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let headers: Vec<header::HeaderName> = config
        .allow_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Dispatch handler.
/// Resolves the namespace, rewrites the request and forwards it.
async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let start_time = Instant::now();
    let (mut parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(str::to_string);

    let destination = state
        .router
        .resolve(&path)
        .ok_or_else(|| GatewayError::NotFound {
            method: parts.method.clone(),
            path: path.clone(),
        })?;

    let service = destination.service_name().to_string();
    let upstream_url = destination.upstream_url(query.as_deref());
    let rewrite = destination.manifest_rewrite(&state.manifest_path);
    let identity = parts.extensions.remove::<VerifiedIdentity>();
    let identity = identity.as_ref().filter(|_| destination.carries_identity());

    if rewrite.is_some() {
        // the index page is rewritten as text, so ask for it uncompressed
        parts.headers.remove(header::ACCEPT_ENCODING);
    }

    tracing::debug!(
        request_id = %request_id(&parts),
        method = %parts.method,
        path = %path,
        service = %service,
        upstream = %upstream_url,
        subject = ?identity.and_then(VerifiedIdentity::subject),
        "Proxying request"
    );

    let upstream = build_upstream_request(
        parts,
        body,
        &upstream_url,
        identity,
        state.forward_credentials,
        &service,
    )?;

    let response = state
        .client
        .request(upstream)
        .await
        .map_err(|e| GatewayError::upstream(service.as_str(), e))?;

    metrics::record_request(&service, response.status().as_u16(), start_time);

    let response = relay(response);
    match rewrite {
        Some(rewrite) => rewrite_manifest(response, &rewrite, &service).await,
        None => Ok(response),
    }
}
