//! JSON transform middleware for axum.
//! Applies the filter's rules to real HTTP requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde_json::{json, Value};

use crate::config::{AppConfig, TransformConfig};
use crate::filter::{json_content_type, TransformError, CONTENT_TYPE_JSON};

/// Decoded JSON request body, inserted into request extensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload(pub Value);

/// JSON response value left for the middleware to encode.
///
/// Renders as an empty `application/json` response carrying the value in its
/// extensions. With `transform_response` disabled the value is never written
/// out and the client receives an empty body; the middleware logs a warning
/// when that happens.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonValue(pub Value);

impl IntoResponse for JsonValue {
    fn into_response(self) -> Response {
        let mut response = (
            [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))],
            Body::empty(),
        )
            .into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware state.
#[derive(Clone, Debug)]
pub struct TransformState {
    pub config: TransformConfig,
    pub max_body_bytes: usize,
}

impl TransformState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            config: config.transform,
            max_body_bytes: config.limits.max_body_bytes,
        }
    }
}

impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        let status = match self {
            TransformError::Decode(_) | TransformError::Body(_) => StatusCode::BAD_REQUEST,
            TransformError::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            TransformError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn header_entries(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> + '_ {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
}

pub async fn json_transform_middleware(
    State(state): State<TransformState>,
    request: Request,
    next: Next,
) -> Result<Response, TransformError> {
    let request = if state.config.transform_request
        && json_content_type(header_entries(request.headers()))
    {
        attach_payload(request, state.max_body_bytes).await?
    } else {
        request
    };

    let mut response = next.run(request).await;

    if state.config.transform_response && json_content_type(header_entries(response.headers())) {
        encode_response(&mut response)?;
    } else if response.extensions().get::<JsonValue>().is_some() {
        tracing::warn!(
            status = %response.status(),
            "JSON response value left unencoded, sending empty body"
        );
    }

    Ok(response)
}

/// Buffer the body, decode it into a [`Payload`] and put the raw bytes back.
async fn attach_payload(request: Request, limit: usize) -> Result<Request, TransformError> {
    let (mut parts, body) = request.into_parts();
    let bytes: Bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| {
            if is_length_limit(&e) {
                TransformError::BodyTooLarge(limit)
            } else {
                TransformError::Body(e.to_string())
            }
        })?;

    // An empty body is treated as no body source at all.
    if !bytes.is_empty() {
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Rejecting undecodable JSON body");
            TransformError::Decode(e)
        })?;
        tracing::debug!(path = %parts.uri.path(), bytes = bytes.len(), "Attached JSON payload");
        parts.extensions.insert(Payload(value));
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

/// Whether a body read failed because it hit the buffering limit.
fn is_length_limit(err: &axum::Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Replace the body with the encoded [`JsonValue`], if the handler left one.
fn encode_response(response: &mut Response) -> Result<(), TransformError> {
    let Some(JsonValue(value)) = response.extensions_mut().remove::<JsonValue>() else {
        return Ok(());
    };
    if value.is_null() {
        return Ok(());
    }

    let encoded = serde_json::to_string(&value).map_err(TransformError::Encode)?;
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(encoded.len()));
    tracing::debug!(bytes = encoded.len(), "Encoded JSON response");
    *response.body_mut() = Body::from(encoded);
    Ok(())
}
