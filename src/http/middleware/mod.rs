//! Axum middleware.

pub mod json_transform;

pub use json_transform::{json_transform_middleware, JsonValue, Payload, TransformState};
