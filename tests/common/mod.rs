//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use edge_gateway::config::{GatewayConfig, ServiceConfig};
use edge_gateway::{GatewayServer, Shutdown};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-secret";

pub const DOCS_INDEX: &str =
    r##"<html><script>SwaggerUIBundle({"url":"/swagger/doc.json","dom_id":"#swagger-ui"})</script></html>"##;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path_and_query: String,
    pub user_id: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

/// Requests received by a mock backend, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    pub fn all(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Captured {
        self.all().pop().expect("backend received no request")
    }
}

async fn capture(State(recorder): State<Recorder>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let get_header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let captured = Captured {
        method: parts.method.to_string(),
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        user_id: get_header("user-id"),
        authorization: get_header("authorization"),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    recorder.requests.lock().unwrap().push(captured);

    let status = parts
        .headers
        .get("x-respond-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .and_then(|v| StatusCode::from_u16(v).ok())
        .unwrap_or(StatusCode::OK);

    (
        status,
        [("x-backend", "mock")],
        format!("echo {}", parts.uri.path()),
    )
        .into_response()
}

async fn docs_index(State(recorder): State<Recorder>, request: Request) -> Response {
    capture(State(recorder), request).await;
    ([(header::CONTENT_TYPE, "text/html")], DOCS_INDEX).into_response()
}

/// Start a capturing backend on an ephemeral port.
pub async fn start_backend() -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/swagger/index.html", get(docs_index))
        .fallback(capture)
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, recorder)
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gateway configuration with the given namespaces pointed at backends.
pub fn gateway_config(services: &[(&str, SocketAddr)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.auth.jwt_secret = SECRET.to_string();
    for (namespace, addr) in services {
        config.services.push(ServiceConfig::new(
            format!("{namespace}-service"),
            *namespace,
            format!("http://{addr}"),
        ));
    }
    config
}

/// A running gateway.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let server = GatewayServer::new(config).expect("valid gateway config");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with_secret(SECRET, claims)
}

pub fn sign_with_secret(secret: &str, claims: &Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}
