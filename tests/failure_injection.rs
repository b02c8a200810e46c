//! Failure injection tests for the gateway.

use axum::http::StatusCode;
use edge_gateway::config::{ConfigError, ValidationError};
use edge_gateway::GatewayServer;
use serde_json::json;

mod common;

use common::*;

#[tokio::test]
async fn test_unreachable_backend_is_500() {
    let dead = dead_address().await;
    let gateway = start_gateway(gateway_config(&[("presence", dead)])).await;

    let token = sign(&json!({ "sub": "u1" }));
    let res = client()
        .get(gateway.url("/presence/u1"))
        .header("authorization", bearer(&token))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body, json!({ "error": "Upstream service unavailable" }));
    assert!(!body.to_string().contains(&dead.to_string()));
}

#[tokio::test]
async fn test_backend_status_relayed_verbatim() {
    let (backend, recorder) = start_backend().await;
    let gateway = start_gateway(gateway_config(&[("notifications", backend)])).await;

    let token = sign(&json!({ "sub": "u1" }));
    for status in [404u16, 418, 503] {
        let res = client()
            .get(gateway.url("/notifications/unread"))
            .header("authorization", bearer(&token))
            .header("x-respond-status", status.to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), status);
        assert_eq!(res.headers().get("x-backend").unwrap(), "mock");
        assert_eq!(res.text().await.unwrap(), "echo /notifications/unread");
    }

    // no retries on server errors
    assert_eq!(recorder.count(), 3);
}

#[tokio::test]
async fn test_invalid_config_refused() {
    let mut config = gateway_config(&[]);
    config.auth.jwt_secret.clear();

    match GatewayServer::new(config) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors, vec![ValidationError::EmptySecret]);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("server must not start without a secret"),
    }
}
