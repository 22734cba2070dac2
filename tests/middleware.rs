//! End-to-end tests of the JSON transform middleware on an axum router.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use json_transform::http::{app, middleware::json_transform_middleware, JsonValue, Payload, TransformState};
use futures_util::stream;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{body_string, config_with, header_str, request};

/// Router whose handler reports whether a payload was attached and what the
/// raw body still contains.
fn inspecting_app(transform_request: bool, transform_response: bool) -> Router {
    let config = config_with(transform_request, transform_response);
    Router::new()
        .route("/inspect", post(inspect))
        .route("/value", get(|| async { JsonValue(json!({ "full_name": "X Y" })) }))
        .route("/null", get(|| async { JsonValue(Value::Null) }))
        .route(
            "/plain",
            get(|| async { ([(header::CONTENT_TYPE, "text/plain")], "It works!") }),
        )
        .layer(middleware::from_fn_with_state(
            TransformState::from_config(&config),
            json_transform_middleware,
        ))
}

async fn inspect(request: Request) -> impl IntoResponse {
    let payload = request.extensions().get::<Payload>().map(|p| p.0.clone());
    let raw = axum::body::to_bytes(request.into_body(), usize::MAX).await.unwrap();
    let report = json!({
        "payload": payload,
        "raw": String::from_utf8_lossy(&raw),
    });
    ([(header::CONTENT_TYPE, "text/plain")], report.to_string())
}

async fn report(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// --- request side ---

#[tokio::test]
async fn json_request_gets_payload_and_keeps_raw_body() {
    let resp = inspecting_app(true, true)
        .oneshot(request("POST", "/inspect", Some("application/json"), r#"{"a":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let report = report(resp).await;
    assert_eq!(report["payload"], json!({ "a": 1 }));
    assert_eq!(report["raw"], r#"{"a":1}"#);
}

#[tokio::test]
async fn uppercase_content_type_is_json() {
    let resp = inspecting_app(true, true)
        .oneshot(request("POST", "/inspect", Some("APPLICATION/JSON"), "[1,2]"))
        .await
        .unwrap();

    assert_eq!(report(resp).await["payload"], json!([1, 2]));
}

#[tokio::test]
async fn non_json_request_passes_through() {
    let resp = inspecting_app(true, true)
        .oneshot(request("POST", "/inspect", Some("text/plain"), r#"{"a":1}"#))
        .await
        .unwrap();

    let report = report(resp).await;
    assert_eq!(report["payload"], Value::Null);
    assert_eq!(report["raw"], r#"{"a":1}"#);
}

#[tokio::test]
async fn disabled_request_transform_never_attaches_payload() {
    let resp = inspecting_app(false, true)
        .oneshot(request("POST", "/inspect", Some("application/json"), r#"{"a":1}"#))
        .await
        .unwrap();

    assert_eq!(report(resp).await["payload"], Value::Null);
}

#[tokio::test]
async fn empty_json_body_is_not_decoded() {
    let resp = inspecting_app(true, true)
        .oneshot(request("POST", "/inspect", Some("application/json"), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(report(resp).await["payload"], Value::Null);
}

#[tokio::test]
async fn malformed_json_is_rejected_with_400() {
    let resp = inspecting_app(true, true)
        .oneshot(request("POST", "/inspect", Some("application/json"), "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("failed to decode JSON request body"));
}

#[tokio::test]
async fn oversized_body_is_rejected_with_413() {
    let mut config = config_with(true, true);
    config.limits.max_body_bytes = 4;
    let router = Router::new()
        .route("/inspect", post(inspect))
        .layer(middleware::from_fn_with_state(
            TransformState::from_config(&config),
            json_transform_middleware,
        ));

    let resp = router
        .oneshot(request("POST", "/inspect", Some("application/json"), r#"{"a":12345}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "request body exceeds 4 bytes");
}

#[tokio::test]
async fn aborted_upload_is_rejected_with_400() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(br#"{"a":"#)),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
    ];
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/inspect")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(stream::iter(chunks)))
        .unwrap();

    let resp = inspecting_app(true, true).oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("failed to read request body"));
}

// --- response side ---

#[tokio::test]
async fn json_value_is_encoded_with_length() {
    let resp = inspecting_app(true, true)
        .oneshot(request("GET", "/value", None, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), Some("application/json"));
    assert_eq!(header_str(&resp, header::CONTENT_LENGTH), Some("19"));
    assert_eq!(body_string(resp).await, r#"{"full_name":"X Y"}"#);
}

#[tokio::test]
async fn disabled_response_transform_leaves_body_untouched() {
    let resp = inspecting_app(true, false)
        .oneshot(request("GET", "/value", None, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "");
}

#[tokio::test]
async fn null_value_is_not_encoded() {
    let resp = inspecting_app(true, true)
        .oneshot(request("GET", "/null", None, ""))
        .await
        .unwrap();

    assert_eq!(body_string(resp).await, "");
}

#[tokio::test]
async fn non_json_response_passes_through() {
    let resp = inspecting_app(true, true)
        .oneshot(request("GET", "/plain", None, ""))
        .await
        .unwrap();

    assert_eq!(body_string(resp).await, "It works!");
}

// --- demo router ---

#[tokio::test]
async fn echo_round_trips_payload() {
    let resp = app(&config_with(true, true))
        .oneshot(request(
            "POST",
            "/echo",
            Some("application/json"),
            r#"{ "forenames": ["Napoleon", "Neech"], "surname": "Manly" }"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_LENGTH), Some("52"));
    assert_eq!(
        body_string(resp).await,
        r#"{"forenames":["Napoleon","Neech"],"surname":"Manly"}"#
    );
}

#[tokio::test]
async fn echo_without_json_is_415() {
    let resp = app(&config_with(true, true))
        .oneshot(request("POST", "/echo", Some("text/plain"), "hi"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn health_is_ok() {
    let resp = app(&config_with(true, true))
        .oneshot(request("GET", "/health", None, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "OK");
}
