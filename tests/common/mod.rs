//! Shared utilities for integration tests.

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use http_body_util::BodyExt;
use json_transform::config::AppConfig;

/// Config with the given transform toggles and defaults elsewhere.
pub fn config_with(transform_request: bool, transform_response: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.transform.transform_request = transform_request;
    config.transform.transform_response = transform_response;
    config
}

pub fn request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
