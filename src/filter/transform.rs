//! The JSON transform filter.
//!
//! # Flow
//! ```text
//! RequestContext
//!     → decode `http.input` into `payload` (when enabled and JSON)
//!     → inner handler
//!     → encode body, set length header (when enabled and JSON)
//!     → Response
//! ```

use crate::config::TransformConfig;
use crate::filter::content_type::{
    json_content_type, length_key_for, lookup_header, CONTENT_TYPE_KEYS,
};
use crate::filter::context::{RequestContext, PAYLOAD_KEY};
use crate::filter::error::TransformError;
use crate::filter::response::{Response, ResponseBody};

/// The wrapped application.
pub trait Handler {
    fn call(&self, ctx: RequestContext) -> Response;
}

impl<F> Handler for F
where
    F: Fn(RequestContext) -> Response,
{
    fn call(&self, ctx: RequestContext) -> Response {
        self(ctx)
    }
}

/// Filter decoding JSON request bodies and encoding JSON response bodies
/// around an inner [`Handler`].
#[derive(Debug, Clone)]
pub struct JsonTransform<H> {
    inner: H,
    config: TransformConfig,
}

impl<H: Handler> JsonTransform<H> {
    /// Wrap `inner` with both transforms enabled.
    pub fn new(inner: H) -> Self {
        Self::with_config(inner, TransformConfig::default())
    }

    pub fn with_config(inner: H, config: TransformConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Run one request through the filter and the inner handler.
    pub fn handle(&self, mut ctx: RequestContext) -> Result<Response, TransformError> {
        if self.transform_request_eligible(&ctx) {
            if let Some(input) = ctx.input() {
                let payload: serde_json::Value = serde_json::from_slice(input).map_err(|e| {
                    tracing::warn!(error = %e, "Rejecting request with undecodable JSON body");
                    TransformError::Decode(e)
                })?;
                tracing::debug!(bytes = input.len(), "Attached decoded JSON payload");
                ctx.insert(PAYLOAD_KEY, payload);
            }
        }

        let mut response = self.inner.call(ctx);

        if self.transform_response_eligible(&response) {
            encode_body(&mut response)?;
        }

        Ok(response)
    }

    /// Whether `ctx` should have its body decoded.
    ///
    /// An empty body counts as no body source.
    pub fn transform_request_eligible(&self, ctx: &RequestContext) -> bool {
        self.config.transform_request
            && json_content_type(ctx.text_entries())
            && ctx.input().is_some_and(|input| !input.is_empty())
    }

    /// Whether `response` should have its body encoded.
    pub fn transform_response_eligible(&self, response: &Response) -> bool {
        self.config.transform_response
            && json_content_type(response.header_entries())
            && !response.body.is_blank()
    }
}

/// Serialize the body of a JSON response into a single string chunk and
/// record its byte length.
fn encode_body(response: &mut Response) -> Result<(), TransformError> {
    let body = std::mem::replace(&mut response.body, ResponseBody::Empty);
    let encoded = match body {
        ResponseBody::Text(s) => s,
        ResponseBody::Chunks(chunks) => {
            serde_json::to_string(&chunks).map_err(TransformError::Encode)?
        }
        ResponseBody::Value(value) => {
            serde_json::to_string(&value).map_err(TransformError::Encode)?
        }
        ResponseBody::Empty => String::new(),
    };

    let length_key = lookup_header(response.header_entries(), &CONTENT_TYPE_KEYS)
        .map(|(key, _)| length_key_for(key))
        .unwrap_or_else(|| "Content-Length".to_string());
    response.set_header(&length_key, encoded.len().to_string());

    tracing::debug!(bytes = encoded.len(), "Encoded JSON response body");
    response.body = ResponseBody::Chunks(vec![encoded]);
    Ok(())
}
