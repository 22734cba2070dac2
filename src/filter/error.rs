//! Errors raised while transforming requests and responses.

use thiserror::Error;

/// Failures surfaced by the JSON transform.
///
/// Codec errors are carried verbatim as the source.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The request body was declared as JSON but did not parse.
    #[error("failed to decode JSON request body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response value could not be serialized.
    #[error("failed to encode JSON response body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request body exceeded the configured limit.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),
}
