//! End-to-end tests for the `?url=` relay.

use std::time::{Duration, Instant};

use axum::{
    extract::RawQuery,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

mod common;

fn upstream_router() -> Router {
    Router::new()
        .route(
            "/api.php",
            get(|RawQuery(query): RawQuery, headers: HeaderMap| async move {
                let seen = json!({
                    "query": query,
                    "authorization": headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok()),
                });
                (
                    [
                        (header::SET_COOKIE, "session=secret"),
                        (header::HeaderName::from_static("x-upstream"), "yes"),
                    ],
                    Json(seen),
                )
            }),
        )
        .route("/submit", post(|body: String| async move { format!("got:{}", body) }))
        .route(
            "/bom",
            get(|| async {
                ([(header::CONTENT_TYPE, "text/plain")], "\u{feff}hello\0 world")
            }),
        )
        .route(
            "/blob",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/octet-stream")],
                    vec![0u8, 159, 146, 150, 0],
                )
            }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "nope").into_response() }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        )
}

#[tokio::test]
async fn test_relay_appends_params_and_strips_cookies() {
    let upstream = common::start_upstream(upstream_router()).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;

    let target = format!("http://{}/api.php?ac=list", upstream);
    let res = common::client()
        .get(format!("http://{}/", gateway))
        .query(&[("url", target.as_str()), ("pg", "2")])
        .header(header::AUTHORIZATION, "Bearer abc")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(res.headers().get("x-upstream").unwrap(), "yes");
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");
    assert!(res.headers().get("x-request-id").is_some());

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["query"], "ac=list&pg=2");
    assert_eq!(body["authorization"], "Bearer abc");

    shutdown.trigger();
}

#[tokio::test]
async fn test_path_form_and_post_body() {
    let upstream = common::start_upstream(upstream_router()).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;

    let target = format!("http://{}/submit", upstream);
    let res = common::client()
        .post(format!("http://{}/p/local", gateway))
        .query(&[("url", target.as_str())])
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "got:payload");

    shutdown.trigger();
}

#[tokio::test]
async fn test_text_bodies_are_cleaned_and_binary_passes_through() {
    let upstream = common::start_upstream(upstream_router()).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("http://{}/bom", upstream))])
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(res.text().await.unwrap(), "hello world");

    let res = client
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("http://{}/blob", upstream))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.bytes().await.unwrap().as_ref(), &[0u8, 159, 146, 150, 0]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_is_relayed() {
    let upstream = common::start_upstream(upstream_router()).await;
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;

    let res = common::client()
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("http://{}/missing", upstream))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_and_looping_targets_are_rejected() {
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/", gateway))
        .query(&[("url", "ftp://files.example/x")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid target URL");

    let res = client
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("{}/?url=https://a.example", common::GATEWAY_ORIGIN))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Loop detected");

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = common::start_upstream(upstream_router()).await;
    let mut config = common::test_config();
    config.timeouts.proxy_secs = 1;
    let (gateway, shutdown) = common::start_gateway(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("http://{}/slow", upstream))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(start.elapsed() < Duration::from_secs(3));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Proxy Error");
    assert!(body["message"].as_str().unwrap().contains("timed out"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (gateway, shutdown) = common::start_gateway(common::test_config()).await;

    let res = common::client()
        .get(format!("http://{}/", gateway))
        .query(&[("url", format!("http://{}/gone", closed))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Proxy Error");
    assert!(body.get("message").is_some());

    shutdown.trigger();
}
