//! Documentation proxy tests.

use axum::http::StatusCode;

mod common;

use common::*;

#[tokio::test]
async fn test_service_docs_index_is_rewritten() {
    let (backend, recorder) = start_backend().await;
    let gateway = start_gateway(gateway_config(&[("auth", backend)])).await;

    for path in ["/auth/swagger/index.html", "/auth/swagger/"] {
        let res = client()
            .get(gateway.url(path))
            .header("accept-encoding", "gzip")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        assert_eq!(res.headers().get("content-type").unwrap(), "text/html");

        let body = res.text().await.unwrap();
        assert!(body.contains(r#""url":"/auth/swagger/doc.json""#), "{body}");
        assert!(!body.contains(r#""url":"/swagger/doc.json""#));
        assert_eq!(recorder.last().path_and_query, "/swagger/index.html");
    }
}

#[tokio::test]
async fn test_service_docs_assets_pass_through() {
    let (backend, recorder) = start_backend().await;
    let gateway = start_gateway(gateway_config(&[("users", backend)])).await;

    let res = client()
        .get(gateway.url("/users/swagger/doc.json"))
        .header("user-id", "spoofed")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "echo /swagger/doc.json");

    let seen = recorder.last();
    assert_eq!(seen.path_and_query, "/swagger/doc.json");
    assert_eq!(seen.user_id, None);
}

#[tokio::test]
async fn test_bare_docs_segment_needs_credential() {
    let (backend, recorder) = start_backend().await;
    let gateway = start_gateway(gateway_config(&[("users", backend)])).await;

    let res = client().get(gateway.url("/users/swagger")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(recorder.count(), 0);

    let token = sign(&serde_json::json!({ "sub": "u1" }));
    let res = client()
        .get(gateway.url("/users/swagger"))
        .header("authorization", bearer(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = recorder.last();
    assert_eq!(seen.path_and_query, "/users/swagger");
    assert_eq!(seen.user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_gateway_docs_forwarded_to_upstream() {
    let (docs, recorder) = start_backend().await;
    let mut config = gateway_config(&[]);
    config.docs.upstream = Some(format!("http://{docs}"));
    let gateway = start_gateway(config).await;

    let res = client()
        .get(gateway.url("/swagger/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // the gateway's own index page is served as-is
    let body = res.text().await.unwrap();
    assert_eq!(body, DOCS_INDEX);
    assert_eq!(recorder.last().path_and_query, "/swagger/index.html");
}

#[tokio::test]
async fn test_gateway_docs_without_upstream_not_found() {
    let gateway = start_gateway(gateway_config(&[])).await;

    let res = client()
        .get(gateway.url("/swagger/index.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
